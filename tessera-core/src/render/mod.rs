//! Compositing primitives
//!
//! Everything the render pass needs below the registry: the output sink
//! capability, the coverage grid, dithering and the frame rate overlay.

pub mod coverage;
pub mod dither;
pub mod overlay;
pub mod sink;

use embedded_graphics::geometry::{Point, Size};

use crate::window::Surface;

pub use coverage::CoverageGrid;
pub use overlay::FrameClock;
pub use sink::{MemorySink, OutputSink, SinkTarget};

/// Per-pass statistics returned by the render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Windows painted this pass
    pub windows: usize,
    /// Windows still animating after the tick
    pub animating: usize,
    /// Windows destroyed this pass
    pub destroyed: usize,
    /// Milliseconds since the previous pass (0 on the first)
    pub interval_ms: u32,
    /// Frames per second derived from the interval
    pub fps: u32,
}

/// Dither a window's display buffer onto the sink with its top-left at
/// `origin`
///
/// Draws the border first when `border` is set. Pixels that land outside
/// `screen` are skipped entirely, error diffusion included.
pub fn paint_window<S: OutputSink>(
    sink: &mut S,
    surface: &mut Surface,
    origin: Point,
    border: bool,
    screen: Size,
) {
    let width = surface.width() as usize;
    let height = surface.height() as usize;
    let mode = surface.dither();

    if border {
        sink.draw_rect_outline(
            origin.x - 1,
            origin.y - 1,
            width as u32 + 2,
            height as u32 + 2,
        );
    }

    let pixels = surface.pixels_mut();
    for y in 0..height {
        let sy = origin.y + y as i32;
        if sy < 0 || sy >= screen.height as i32 {
            continue;
        }
        for x in 0..width {
            let sx = origin.x + x as i32;
            if sx < 0 || sx >= screen.width as i32 {
                continue;
            }
            let on = dither::quantize(mode, pixels, width, height, x, y);
            sink.write_pixel(sx, sy, on);
        }
    }
}

/// Write "off" on every uncovered pixel where `x + y` is even
pub fn draw_mask<S: OutputSink>(sink: &mut S, coverage: &CoverageGrid) {
    for y in 0..coverage.height() as i32 {
        for x in 0..coverage.width() as i32 {
            if (x + y) % 2 == 0 && !coverage.is_covered(x, y) {
                sink.write_pixel(x, y, false);
            }
        }
    }
}
