//! Window registry
//!
//! [`WindowManager`] owns the z-order, the animation clock, the coverage
//! grid and the pending-destroy list, and runs the render pass.

pub mod manager;
pub mod zorder;

pub use manager::WindowManager;
pub use zorder::{Layered, ZOrder};
