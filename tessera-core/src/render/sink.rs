//! Output sink capability
//!
//! The compositor only needs three operations from the physical display
//! side; the transport (SPI/I2C) and panel are not its concern.

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Pixel;

use crate::window::WindowError;

/// Binary output surface the compositor paints into
///
/// Pixel writes are buffered; nothing reaches the panel until
/// [`flush`](OutputSink::flush). Coordinates outside the panel must be
/// ignored.
#[allow(async_fn_in_trait)]
pub trait OutputSink {
    /// Error type for flushing to the panel
    type Error;

    /// Set a single pixel on or off
    fn write_pixel(&mut self, x: i32, y: i32, on: bool);

    /// Draw a one-pixel "on" rectangle outline
    fn draw_rect_outline(&mut self, x: i32, y: i32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let right = x + width as i32 - 1;
        let bottom = y + height as i32 - 1;
        for px in x..=right {
            self.write_pixel(px, y, true);
            self.write_pixel(px, bottom, true);
        }
        for py in y..=bottom {
            self.write_pixel(x, py, true);
            self.write_pixel(right, py, true);
        }
    }

    /// Send buffered content to the panel
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Adapter exposing an [`OutputSink`] as an embedded-graphics draw target
///
/// Used for overlays (frame rate text) that are drawn straight onto the
/// output rather than through a window.
pub struct SinkTarget<'a, S: OutputSink> {
    sink: &'a mut S,
    size: Size,
}

impl<'a, S: OutputSink> SinkTarget<'a, S> {
    /// Wrap `sink`, clipping to `width` x `height`
    pub fn new(sink: &'a mut S, width: u16, height: u16) -> Self {
        Self {
            sink,
            size: Size::new(width as u32, height as u32),
        }
    }
}

impl<S: OutputSink> OriginDimensions for SinkTarget<'_, S> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<S: OutputSink> DrawTarget for SinkTarget<'_, S> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                self.sink.write_pixel(point.x, point.y, color.is_on());
            }
        }
        Ok(())
    }
}

/// In-memory sink, one byte per pixel
///
/// Useful for host-side simulation and tests. Keeps the last flushed frame
/// separately from the frame being painted.
#[derive(Debug, Clone)]
pub struct MemorySink {
    width: u16,
    height: u16,
    pixels: Vec<bool>,
    flushed: Vec<bool>,
    flushes: usize,
}

impl MemorySink {
    /// Allocate an all-off sink
    pub fn new(width: u16, height: u16) -> Result<Self, WindowError> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| WindowError::OutOfMemory)?;
        pixels.resize(len, false);
        let flushed = pixels.clone();
        Ok(Self {
            width,
            height,
            pixels,
            flushed,
            flushes: 0,
        })
    }

    /// Current (unflushed) state of a pixel; off-screen reads as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.pixels[i])
    }

    /// State of a pixel as of the last flush
    pub fn flushed_pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.flushed[i])
    }

    /// Number of lit pixels in the current frame
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&on| on).count()
    }

    /// Number of flushes so far
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(x as usize + y as usize * self.width as usize)
        }
    }
}

impl OutputSink for MemorySink {
    type Error = Infallible;

    fn write_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = on;
        }
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushed.copy_from_slice(&self.pixels);
        self.flushes += 1;
        Ok(())
    }
}
