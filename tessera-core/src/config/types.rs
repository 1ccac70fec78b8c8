//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default output width in pixels
pub const DEFAULT_WIDTH: u16 = 128;

/// Default output height in pixels
pub const DEFAULT_HEIGHT: u16 = 64;

/// Default animation progress added per render pass (~24 frames per slide)
pub const DEFAULT_ANIMATION_STEP: f32 = 0.042;

/// Default render pass period in milliseconds
pub const DEFAULT_RENDER_PERIOD_MS: u32 = 24;

/// Default per-window key event queue length
pub const DEFAULT_EVENT_QUEUE_LEN: usize = 10;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Output width or height is zero
    ZeroResolution,
    /// Animation step outside (0, 1]
    InvalidAnimationStep,
    /// Render period is zero
    ZeroRenderPeriod,
}

/// Compositor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompositorConfig {
    /// Output width in pixels
    pub width: u16,
    /// Output height in pixels
    pub height: u16,
    /// Animation progress added per render pass
    pub animation_step: f32,
    /// Render pass period in milliseconds
    pub render_period_ms: u32,
    /// Draw the frame rate overlay in the top-left corner
    pub show_fps: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositorConfig {
    /// Create a configuration with default values
    pub const fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            animation_step: DEFAULT_ANIMATION_STEP,
            render_period_ms: DEFAULT_RENDER_PERIOD_MS,
            show_fps: false,
        }
    }

    /// Set the output resolution
    pub const fn with_resolution(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the animation step
    pub const fn with_animation_step(mut self, step: f32) -> Self {
        self.animation_step = step;
        self
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        // NaN fails both comparisons
        if !(self.animation_step > 0.0 && self.animation_step <= 1.0) {
            return Err(ConfigError::InvalidAnimationStep);
        }
        if self.render_period_ms == 0 {
            return Err(ConfigError::ZeroRenderPeriod);
        }
        Ok(())
    }

    /// Number of pixels in the output frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
