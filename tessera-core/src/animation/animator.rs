//! Animation clock
//!
//! Holds at most one entry per window. Entries stay in the list after they
//! finish so the registry can see that an exit completed; [`Animator::sweep`]
//! drops them afterwards.

use alloc::vec::Vec;

use super::{AnimationState, Direction};
use crate::config::DEFAULT_ANIMATION_STEP;
use crate::window::WindowId;

/// Per-window slide animation state
#[derive(Debug, Clone)]
pub struct Animator {
    step: f32,
    entries: Vec<AnimationState>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_STEP)
    }
}

impl Animator {
    /// Create an animator advancing by `step` per tick
    pub fn new(step: f32) -> Self {
        Self {
            step,
            entries: Vec::new(),
        }
    }

    /// Progress added per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Start (or redirect) the animation for `window`
    ///
    /// Reversing a running animation continues from `1 - progress`; the
    /// same direction is re-activated without resetting progress.
    pub fn start(&mut self, window: WindowId, direction: Direction) {
        match self.entries.iter_mut().find(|e| e.window == window) {
            Some(entry) => {
                if entry.direction != direction {
                    entry.direction = direction;
                    entry.progress = 1.0 - entry.progress;
                }
                entry.active = true;
            }
            None => self.entries.push(AnimationState::new(window, direction)),
        }
    }

    /// Advance every active entry by one step
    pub fn tick(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.active) {
            entry.progress = (entry.progress + self.step).min(1.0);
            if entry.progress >= 1.0 {
                entry.active = false;
            }
        }
    }

    /// Entry for `window`, if any
    pub fn get(&self, window: WindowId) -> Option<&AnimationState> {
        self.entries.iter().find(|e| e.window == window)
    }

    /// Vertical offset of `window` for a slide of `travel` pixels
    ///
    /// Zero unless the window has an active entry.
    pub fn offset(&self, window: WindowId, travel: u16) -> i32 {
        match self.get(window) {
            Some(entry) if entry.active => entry.offset(travel),
            _ => 0,
        }
    }

    /// Check if `window` has an entry that has run to completion
    pub fn is_finished(&self, window: WindowId) -> bool {
        self.get(window).is_some_and(|e| !e.active)
    }

    /// Drop the entry for `window`
    pub fn remove(&mut self, window: WindowId) {
        self.entries.retain(|e| e.window != window);
    }

    /// Drop every finished entry
    pub fn sweep(&mut self) {
        self.entries.retain(|e| e.active);
    }

    /// Number of running animations
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Number of entries, finished ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
