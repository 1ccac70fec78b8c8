//! Monochrome panel output for the Tessera compositor
//!
//! This crate provides:
//! - `FrameBuffer`: 1-bit frame in the page layout used by SSD1306-class
//!   controllers (8 vertical pixels per byte)
//! - `PagePanel` trait for panels that accept whole pages
//! - `BufferedPanel`: an `OutputSink` that paints into a `FrameBuffer` and
//!   sends only the changed pages on flush
//! - `Ssd1306`: async I2C driver for SSD1306 and SH1106 controllers
//!
//! # Architecture
//!
//! ```text
//! WindowManager ──write_pixel──▶ BufferedPanel ──write_page──▶ Ssd1306 ──I2C──▶ panel
//!                                  (FrameBuffer)
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod panel;
pub mod ssd1306;

pub use frame::FrameBuffer;
pub use panel::{BufferedPanel, PagePanel};
pub use ssd1306::{Controller, Ssd1306};
