//! Frame rate overlay

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use super::sink::{OutputSink, SinkTarget};

/// Measures the interval between render passes
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<u32>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last_ms: None }
    }

    /// Record a pass at `now_ms` and return `(interval_ms, fps)`
    ///
    /// The first pass has no interval and reports 0 fps; so does a zero
    /// interval. The millisecond counter may wrap.
    pub fn tick(&mut self, now_ms: u32) -> (u32, u32) {
        let interval = match self.last_ms {
            Some(last) => now_ms.wrapping_sub(last),
            None => 0,
        };
        self.last_ms = Some(now_ms);
        let fps = if interval == 0 { 0 } else { 1000 / interval };
        (interval, fps)
    }
}

/// Draw `FPS: n` in the top-left corner of the output
pub fn draw_fps<S: OutputSink>(sink: &mut S, width: u16, height: u16, fps: u32) {
    let mut text: String<16> = String::new();
    // 16 bytes always fit "FPS: " plus a u32
    let _ = write!(text, "FPS: {}", fps);

    let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
    let mut target = SinkTarget::new(sink, width, height);
    let _ = Text::with_baseline(&text, Point::zero(), style, Baseline::Top).draw(&mut target);
}
