//! Board-agnostic window compositor for small monochrome displays
//!
//! This crate contains all compositor logic that does not depend on
//! a specific display or transport:
//!
//! - Window surfaces with double-buffered grayscale content
//! - Registry and z-order policy with type-based layering
//! - Per-frame coverage grid and transparency mask
//! - Grayscale-to-binary dithering (ordered, error diffusion)
//! - Slide-in/slide-out animation engine
//! - Configuration type definitions
//!
//! # Architecture
//!
//! ```text
//!  producer tasks          render task               input tasks
//!  ──────────────          ───────────               ───────────
//!  Canvas::write_pixel     WindowManager::render_pass  push_key_event
//!  Canvas::commit ──lock──▶ read + dither display buf   │
//!                          ─▶ OutputSink::flush         ▼
//!  Canvas::pop_event ◀──────── per-window Channel ◀─────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod animation;
pub mod config;
pub mod registry;
pub mod render;
pub mod window;

pub use config::CompositorConfig;
pub use registry::WindowManager;
pub use render::{FrameStats, MemorySink, OutputSink};
pub use window::{
    Canvas, DitherMode, KeyEvent, KeyStatus, Window, WindowError, WindowId, WindowKind, WindowSpec,
};
