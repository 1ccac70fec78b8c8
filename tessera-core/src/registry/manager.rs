//! Window manager and render pass

use alloc::sync::Arc;
use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_graphics::geometry::{Point, Size};

use super::zorder::{Layered, ZOrder};
use crate::animation::{AnimationState, Animator, Direction};
use crate::config::{CompositorConfig, DEFAULT_EVENT_QUEUE_LEN};
use crate::render::overlay::{draw_fps, FrameClock};
use crate::render::{draw_mask, paint_window, CoverageGrid, FrameStats, OutputSink};
use crate::window::{Canvas, KeyEvent, Window, WindowError, WindowId, WindowKind, WindowSpec};

impl<M: RawMutex, const Q: usize> Layered for Arc<Window<M, Q>> {
    fn id(&self) -> WindowId {
        (**self).id()
    }

    fn kind(&self) -> WindowKind {
        (**self).kind()
    }
}

/// Window registry and compositor
///
/// Not internally synchronized: callers on different tasks share it behind
/// a registry-level lock.
pub struct WindowManager<M: RawMutex, const Q: usize = DEFAULT_EVENT_QUEUE_LEN> {
    config: CompositorConfig,
    order: ZOrder<Arc<Window<M, Q>>>,
    pending: Vec<WindowId>,
    animator: Animator,
    coverage: CoverageGrid,
    clock: FrameClock,
    show_fps: bool,
    next_id: Option<u32>,
}

impl<M: RawMutex, const Q: usize> WindowManager<M, Q> {
    /// Create an empty registry for the configured output
    pub fn new(config: CompositorConfig) -> Result<Self, WindowError> {
        config.validate()?;
        Ok(Self {
            coverage: CoverageGrid::new(config.width, config.height)?,
            animator: Animator::new(config.animation_step),
            show_fps: config.show_fps,
            config,
            order: ZOrder::new(),
            pending: Vec::new(),
            clock: FrameClock::new(),
            next_id: Some(0),
        })
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Register a window and start its slide-in
    ///
    /// Without an explicit position the window cascades one pixel right
    /// and down from the current top-most window.
    pub async fn register(&mut self, spec: WindowSpec) -> Result<Canvas<M, Q>, WindowError> {
        let (x, y) = match spec.position {
            Some(position) => position,
            None => self.cascade(spec.width, spec.height).await,
        };

        let id = self.allocate_id()?;
        let window = Arc::new(Window::new(id, &spec, x, y)?);
        let canvas = Canvas::new(window.clone(), spec.width, spec.height)?;

        self.order.insert(window);
        self.animator.start(id, Direction::Entering);
        Ok(canvas)
    }

    /// Start the slide-out; the window is destroyed once it finishes
    pub fn unregister(&mut self, id: WindowId) -> Result<(), WindowError> {
        if !self.order.contains(id) {
            return Err(WindowError::UnknownWindow);
        }
        self.animator.start(id, Direction::Exiting);
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.order.bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.order.send_to_back(id)
    }

    pub fn move_up(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.order.move_up(id)
    }

    pub fn move_down(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.order.move_down(id)
    }

    /// Top-most window, which receives key events
    pub fn foreground(&self) -> Option<Arc<Window<M, Q>>> {
        self.order.top().cloned()
    }

    /// Index of the top-most Modal/Popup, or the window count if none
    pub fn foreground_index(&self) -> usize {
        self.order.foreground_index()
    }

    /// Route a key event to the foreground window
    ///
    /// Waits while that window's queue is full. Returns false when no
    /// window is registered. Tasks sharing the manager behind a lock should
    /// take [`foreground`](Self::foreground) and push after releasing it.
    pub async fn push_key_event(&self, event: KeyEvent) -> bool {
        match self.order.top() {
            Some(window) => {
                window.push_event(event).await;
                true
            }
            None => false,
        }
    }

    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub fn set_show_fps(&mut self, show: bool) {
        self.show_fps = show;
    }

    /// Window ids bottom to top
    pub fn order(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.order.iter().map(|w| w.id())
    }

    pub fn window(&self, id: WindowId) -> Option<&Arc<Window<M, Q>>> {
        self.order.find(id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.order.contains(id)
    }

    /// Number of windows, pending ones included
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if `id` is waiting for its slide-out to finish
    pub fn is_pending(&self, id: WindowId) -> bool {
        self.pending.contains(&id)
    }

    pub fn animation(&self, id: WindowId) -> Option<&AnimationState> {
        self.animator.get(id)
    }

    /// Coverage computed by the last compose
    pub fn coverage(&self) -> &CoverageGrid {
        &self.coverage
    }

    /// Advance animations and destroy windows whose slide-out finished
    ///
    /// Returns `(still animating, destroyed)`.
    pub fn update_animations(&mut self) -> (usize, usize) {
        self.animator.tick();

        let mut destroyed = 0;
        let mut i = 0;
        while i < self.pending.len() {
            let id = self.pending[i];
            if self.animator.is_finished(id) {
                if let Some(window) = self.order.remove(id) {
                    window.retire();
                }
                self.animator.remove(id);
                self.pending.swap_remove(i);
                destroyed += 1;
            } else {
                i += 1;
            }
        }

        self.animator.sweep();
        (self.animator.active_count(), destroyed)
    }

    /// Paint every window onto `sink` without flushing
    ///
    /// Rebuilds coverage from the animated rectangles, paints regular
    /// windows bottom to top, masks the background if an overlay exists,
    /// then paints the overlays. Returns the number of windows painted.
    pub async fn compose<S: OutputSink>(&mut self, sink: &mut S) -> usize {
        let travel = self.config.height;
        let screen = Size::new(self.config.width as u32, self.config.height as u32);

        self.coverage.clear();
        for window in self.order.iter() {
            let offset = self.animator.offset(window.id(), travel);
            let surface = window.lock().await;
            self.coverage.cover(&surface.bounds(offset));
        }

        let mut painted = 0;
        for window in self.order.iter().filter(|w| !w.kind().is_overlay()) {
            self.paint(sink, window, screen).await;
            painted += 1;
        }

        if self.order.iter().any(|w| w.kind().is_overlay()) {
            draw_mask(sink, &self.coverage);
            for window in self.order.iter().filter(|w| w.kind().is_overlay()) {
                self.paint(sink, window, screen).await;
                painted += 1;
            }
        }

        painted
    }

    /// One full render pass
    ///
    /// Holds the sink lock from the first painted pixel through the flush.
    /// `now_ms` feeds the frame rate measurement.
    pub async fn render_pass<SM: RawMutex, S: OutputSink>(
        &mut self,
        sink: &Mutex<SM, S>,
        now_ms: u32,
    ) -> Result<FrameStats, S::Error> {
        let (animating, destroyed) = self.update_animations();

        let mut sink = sink.lock().await;
        let windows = self.compose(&mut *sink).await;

        let (interval_ms, fps) = self.clock.tick(now_ms);
        if self.show_fps {
            draw_fps(&mut *sink, self.config.width, self.config.height, fps);
        }
        sink.flush().await?;

        Ok(FrameStats {
            windows,
            animating,
            destroyed,
            interval_ms,
            fps,
        })
    }

    async fn paint<S: OutputSink>(&self, sink: &mut S, window: &Window<M, Q>, screen: Size) {
        let offset = self.animator.offset(window.id(), self.config.height);
        let mut surface = window.lock().await;
        let (x, y) = surface.position();
        let origin = Point::new(x as i32, y as i32 + offset);
        paint_window(sink, &mut surface, origin, window.has_border(), screen);
    }

    async fn cascade(&self, width: u16, height: u16) -> (i16, i16) {
        let Some(top) = self.order.top() else {
            return (0, 0);
        };
        let (x, y) = top.lock().await.position();
        let mut x = x.saturating_add(1);
        let mut y = y.saturating_add(1);
        if x as i32 + width as i32 > self.config.width as i32 {
            x = 0;
        }
        if y as i32 + height as i32 > self.config.height as i32 {
            y = 0;
        }
        (x, y)
    }

    /// Hand out the next unused handle; handles are never recycled
    fn allocate_id(&mut self) -> Result<WindowId, WindowError> {
        let raw = self.next_id.ok_or(WindowError::HandlesExhausted)?;
        self.next_id = raw.checked_add(1);
        Ok(WindowId::new(raw))
    }
}
