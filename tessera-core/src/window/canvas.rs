//! Producer-side drawing surface
//!
//! The canvas owns the draw buffer, so pixel writes never take a lock.
//! Single-writer: one task owns a canvas and is the only one that writes
//! and commits it. The window lock only separates that task from the
//! renderer.

use alloc::sync::Arc;
use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::Pixel;

use super::{DitherMode, KeyEvent, PixelBuffer, Window, WindowError, WindowId};
use crate::config::DEFAULT_EVENT_QUEUE_LEN;

/// Producer half of a window, returned by registration
pub struct Canvas<M: RawMutex, const Q: usize = DEFAULT_EVENT_QUEUE_LEN> {
    window: Arc<Window<M, Q>>,
    draw: PixelBuffer,
    width: u16,
    height: u16,
}

impl<M: RawMutex, const Q: usize> Canvas<M, Q> {
    pub(crate) fn new(window: Arc<Window<M, Q>>, width: u16, height: u16) -> Result<Self, WindowError> {
        Ok(Self {
            window,
            draw: PixelBuffer::new(width as usize * height as usize)?,
            width,
            height,
        })
    }

    /// Registry handle
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// Shared half of this window
    pub fn window(&self) -> &Arc<Window<M, Q>> {
        &self.window
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Write a grayscale value; coordinates outside the window are dropped
    pub fn write_pixel(&mut self, x: i32, y: i32, value: u8) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            let idx = x as usize + y as usize * self.width as usize;
            self.draw.as_mut_slice()[idx] = value;
        }
    }

    /// Read back a pending (uncommitted) pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            Some(self.draw.as_slice()[x as usize + y as usize * self.width as usize])
        } else {
            None
        }
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: u8) {
        self.draw.as_mut_slice().fill(value);
    }

    /// Publish the draw buffer to the renderer
    ///
    /// The renderer never observes a half-copied frame.
    pub async fn commit(&self) {
        let mut surface = self.window.lock().await;
        let pixels = surface.pixels_mut();
        let n = pixels.len().min(self.draw.len());
        pixels[..n].copy_from_slice(&self.draw.as_slice()[..n]);
    }

    /// Resize the window
    ///
    /// Buffers only grow: when `width * height` exceeds the current
    /// capacity both buffers are reallocated zero-filled, otherwise the
    /// existing allocations are reused. On allocation failure the window
    /// keeps its previous size and both buffers keep their content.
    pub async fn set_size(&mut self, width: u16, height: u16) -> Result<(), WindowError> {
        let len = width as usize * height as usize;
        let mut surface = self.window.lock().await;

        // Both allocations succeed before either buffer changes
        let display = surface.pixels.reserve(len)?;
        let draw = self.draw.reserve(len)?;
        surface.pixels.apply(display);
        self.draw.apply(draw);

        surface.width = width;
        surface.height = height;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Move the window's rest position
    pub async fn set_position(&self, x: i16, y: i16) {
        let mut surface = self.window.lock().await;
        surface.x = x;
        surface.y = y;
    }

    /// Change the dithering policy
    pub async fn set_dither_mode(&self, dither: DitherMode) {
        self.window.lock().await.dither = dither;
    }

    /// Take the oldest queued key event, or [`KeyEvent::IDLE`] if none
    pub fn pop_event(&self) -> KeyEvent {
        self.window.pop_event()
    }

    /// False once the registry has destroyed the window
    pub fn is_registered(&self) -> bool {
        self.window.is_registered()
    }

    /// Allocated draw buffer capacity in pixels
    pub fn capacity(&self) -> usize {
        self.draw.capacity()
    }
}

impl<M: RawMutex, const Q: usize> OriginDimensions for Canvas<M, Q> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl<M: RawMutex, const Q: usize> DrawTarget for Canvas<M, Q> {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.write_pixel(point.x, point.y, color.luma());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.luma());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowSpec;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    type TestCanvas = Canvas<CriticalSectionRawMutex>;

    fn canvas(width: u16, height: u16) -> TestCanvas {
        let spec = WindowSpec::new(width, height);
        let window = Arc::new(Window::new(WindowId::new(7), &spec, 0, 0).unwrap());
        Canvas::new(window, width, height).unwrap()
    }

    #[test]
    fn test_writes_are_clipped() {
        let mut c = canvas(4, 3);
        c.write_pixel(-1, 0, 9);
        c.write_pixel(0, -1, 9);
        c.write_pixel(4, 0, 9);
        c.write_pixel(0, 3, 9);
        assert!((0..3).all(|y| (0..4).all(|x| c.pixel(x, y) == Some(0))));

        c.write_pixel(3, 2, 9);
        assert_eq!(c.pixel(3, 2), Some(9));
        assert_eq!(c.pixel(4, 2), None);
    }

    #[test]
    fn test_draw_invisible_until_commit() {
        let mut c = canvas(2, 2);
        c.fill(200);
        {
            let surface = block_on(c.window().lock());
            assert_eq!(surface.pixels(), &[0, 0, 0, 0]);
        }

        block_on(c.commit());
        {
            let surface = block_on(c.window().lock());
            assert_eq!(surface.pixels(), &[200, 200, 200, 200]);
        }

        // Later drawing does not leak into the snapshot
        c.write_pixel(0, 0, 1);
        let surface = block_on(c.window().lock());
        assert_eq!(surface.pixels()[0], 200);
    }

    #[test]
    fn test_commit_round_trip() {
        let mut c = canvas(5, 4);
        for y in 0..4 {
            for x in 0..5 {
                c.write_pixel(x, y, (x * 40 + y) as u8);
            }
        }
        block_on(c.commit());

        let surface = block_on(c.window().lock());
        assert_eq!(surface.pixels(), c.draw.as_slice());
    }

    #[test]
    fn test_set_size_grows_and_zeroes() {
        let mut c = canvas(4, 4);
        c.fill(50);
        block_on(c.commit());

        block_on(c.set_size(5, 5)).unwrap();
        assert_eq!((c.width(), c.height()), (5, 5));
        assert_eq!(c.capacity(), 25);
        assert_eq!(c.pixel(0, 0), Some(0));

        let surface = block_on(c.window().lock());
        assert_eq!((surface.width(), surface.height()), (5, 5));
        assert_eq!(surface.capacity(), 25);
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_set_size_shrink_then_grow_reuses() {
        let mut c = canvas(10, 10);
        block_on(c.set_size(3, 3)).unwrap();
        assert_eq!(c.capacity(), 100);
        block_on(c.set_size(10, 10)).unwrap();
        assert_eq!(c.capacity(), 100);

        let surface = block_on(c.window().lock());
        assert_eq!(surface.capacity(), 100);
        assert_eq!(surface.pixels().len(), 100);
    }

    #[test]
    fn test_position_and_dither_updates() {
        let c = canvas(2, 2);
        block_on(c.set_position(-3, 40));
        block_on(c.set_dither_mode(DitherMode::Ordered));

        let surface = block_on(c.window().lock());
        assert_eq!(surface.position(), (-3, 40));
        assert_eq!(surface.dither(), DitherMode::Ordered);
    }

    #[test]
    fn test_embedded_graphics_drawing() {
        let mut c = canvas(8, 8);
        Rectangle::new(Point::new(2, 2), Size::new(10, 2))
            .into_styled(PrimitiveStyle::with_fill(Gray8::new(128)))
            .draw(&mut c)
            .unwrap();

        assert_eq!(c.pixel(2, 2), Some(128));
        assert_eq!(c.pixel(7, 3), Some(128));
        assert_eq!(c.pixel(1, 2), Some(0));
        assert_eq!(c.pixel(2, 4), Some(0));

        c.clear(Gray8::WHITE).unwrap();
        assert_eq!(c.pixel(0, 0), Some(255));
    }
}
