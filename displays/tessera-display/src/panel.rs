//! Panel abstraction and buffered output sink

use tessera_core::OutputSink;

use crate::frame::FrameBuffer;

/// A panel that takes its frame one page (8 pixel rows) at a time
#[allow(async_fn_in_trait)]
pub trait PagePanel {
    /// Transport error
    type Error;

    /// Run the controller's power-up sequence
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Write `data` (one byte per column) to `page`, starting at column 0
    async fn write_page(&mut self, page: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Compositor output backed by a local frame buffer
///
/// Pixels land in RAM; [`flush`](OutputSink::flush) sends the pages that
/// changed since the previous flush.
pub struct BufferedPanel<P, const W: usize, const PAGES: usize> {
    panel: P,
    frame: FrameBuffer<W, PAGES>,
}

impl<P: PagePanel, const W: usize, const PAGES: usize> BufferedPanel<P, W, PAGES> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            frame: FrameBuffer::new(),
        }
    }

    /// Initialize the panel and schedule a full redraw
    pub async fn init(&mut self) -> Result<(), P::Error> {
        self.panel.init().await?;
        self.frame.mark_all_dirty();
        Ok(())
    }

    pub fn frame(&self) -> &FrameBuffer<W, PAGES> {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer<W, PAGES> {
        &mut self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn release(self) -> P {
        self.panel
    }
}

impl<P: PagePanel, const W: usize, const PAGES: usize> OutputSink for BufferedPanel<P, W, PAGES> {
    type Error = P::Error;

    fn write_pixel(&mut self, x: i32, y: i32, on: bool) {
        self.frame.set(x, y, on);
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        for page in 0..PAGES {
            if !self.frame.is_dirty(page) {
                continue;
            }
            self.panel.write_page(page as u8, self.frame.page(page)).await?;
            self.frame.mark_clean(page);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingPanel {
        initialized: bool,
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl PagePanel for RecordingPanel {
        type Error = Infallible;

        async fn init(&mut self) -> Result<(), Self::Error> {
            self.initialized = true;
            Ok(())
        }

        async fn write_page(&mut self, page: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.writes.push((page, data.to_vec()));
            Ok(())
        }
    }

    type Panel = BufferedPanel<RecordingPanel, 8, 4>;

    #[test]
    fn test_first_flush_sends_every_page() {
        let mut out = Panel::new(RecordingPanel::default());
        block_on(out.init()).unwrap();
        assert!(out.panel().initialized);

        block_on(out.flush()).unwrap();
        let pages: Vec<u8> = out.panel().writes.iter().map(|(p, _)| *p).collect();
        assert_eq!(pages, [0, 1, 2, 3]);
    }

    #[test]
    fn test_flush_sends_only_changed_pages() {
        let mut out = Panel::new(RecordingPanel::default());
        block_on(out.flush()).unwrap();
        out.panel_mut().writes.clear();

        out.write_pixel(2, 17, true);
        block_on(out.flush()).unwrap();
        let writes = &out.panel().writes;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, 2);
        assert_eq!(writes[0].1, [0, 0, 0b10, 0, 0, 0, 0, 0]);

        // Nothing changed since
        out.panel_mut().writes.clear();
        block_on(out.flush()).unwrap();
        assert!(out.panel().writes.is_empty());
    }

    #[test]
    fn test_outline_via_sink_default() {
        let mut out = Panel::new(RecordingPanel::default());
        out.draw_rect_outline(0, 0, 8, 32);
        // Perimeter of the whole 8x32 frame
        assert_eq!(out.frame().lit_count(), 2 * 8 + 2 * 30);
    }

    #[test]
    fn test_compositor_renders_into_panel() {
        use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
        use embassy_sync::mutex::Mutex;
        use tessera_core::{CompositorConfig, WindowManager, WindowSpec};

        type Oled = BufferedPanel<RecordingPanel, 16, 2>;

        let config = CompositorConfig::new().with_resolution(16, 16);
        let mut mgr: WindowManager<CriticalSectionRawMutex> = WindowManager::new(config).unwrap();
        let sink: Mutex<CriticalSectionRawMutex, Oled> =
            Mutex::new(BufferedPanel::new(RecordingPanel::default()));

        let mut canvas = block_on(mgr.register(WindowSpec::new(4, 4).at(2, 2))).unwrap();
        canvas.fill(255);
        block_on(canvas.commit());

        // Let the slide-in finish, then start from a blank frame
        for _ in 0..24 {
            block_on(mgr.render_pass(&sink, 0)).unwrap();
        }
        {
            let mut out = block_on(sink.lock());
            out.frame_mut().clear();
            out.panel_mut().writes.clear();
        }

        block_on(mgr.render_pass(&sink, 24)).unwrap();
        let out = block_on(sink.lock());
        assert_eq!(out.frame().lit_count(), 16);

        let (_, data) = out.panel().writes.iter().find(|(p, _)| *p == 0).unwrap();
        assert_eq!(&data[..8], &[0, 0, 0x3C, 0x3C, 0x3C, 0x3C, 0, 0]);
    }
}
