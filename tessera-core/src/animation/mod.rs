//! Slide animations
//!
//! Windows slide up from below the screen when registered and slide back
//! down when unregistered. Progress advances by a fixed step every render
//! pass.

pub mod animator;
pub mod easing;

pub use animator::Animator;

use crate::window::WindowId;

/// Slide direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Sliding in from below the screen
    Entering,
    /// Sliding out below the screen
    Exiting,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Entering => Direction::Exiting,
            Direction::Exiting => Direction::Entering,
        }
    }

    /// Vertical offset at `progress` for a slide of `travel` pixels
    ///
    /// Entering goes from `travel` to 0 on an ease-out curve, exiting from
    /// 0 to `travel` on an ease-in curve.
    pub fn offset(self, progress: f32, travel: u16) -> i32 {
        let (start, end, eased) = match self {
            Direction::Entering => (travel as f32, 0.0, easing::ease_out_sextic(progress)),
            Direction::Exiting => (0.0, travel as f32, easing::ease_in_quintic(progress)),
        };
        (start + (end - start) * eased) as i32
    }
}

/// Animation entry for one window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationState {
    pub window: WindowId,
    pub direction: Direction,
    /// In `[0, 1]`
    pub progress: f32,
    /// Cleared when progress reaches 1
    pub active: bool,
}

impl AnimationState {
    pub fn new(window: WindowId, direction: Direction) -> Self {
        Self {
            window,
            direction,
            progress: 0.0,
            active: true,
        }
    }

    /// Current vertical offset for a slide of `travel` pixels
    pub fn offset(&self, travel: u16) -> i32 {
        self.direction.offset(self.progress, travel)
    }
}
