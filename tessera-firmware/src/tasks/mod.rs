//! Embassy async tasks
//!
//! Each task runs independently and shares the compositor through the
//! registry lock in [`crate::channels`].

pub mod demo;
pub mod input;
pub mod render;

pub use demo::{background_task, bouncer_task, dialog_task, pulse_task};
pub use input::button_task;
pub use render::render_task;
