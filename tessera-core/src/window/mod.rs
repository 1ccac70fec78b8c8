//! Window surfaces
//!
//! A window is split into two halves:
//!
//! - [`Window`]: the shared half, owned by the registry and read by the
//!   renderer. Holds the display buffer and geometry behind a per-window
//!   lock, plus the bounded key event queue.
//! - [`Canvas`]: the producer half, owned by exactly one content task.
//!   Holds the draw buffer; nothing drawn is visible until
//!   [`Canvas::commit`] copies it into the display buffer.

pub mod buffer;
pub mod canvas;
pub mod events;

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::{ConfigError, DEFAULT_EVENT_QUEUE_LEN};

pub use buffer::{PixelBuffer, Reserved};
pub use canvas::Canvas;
pub use events::{KeyEvent, KeyStatus};

/// Window errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowError {
    /// Handle does not refer to a registered window
    UnknownWindow,
    /// Buffer growth could not be allocated
    OutOfMemory,
    /// Compositor configuration rejected
    Config(ConfigError),
    /// Every window handle has been handed out once
    HandlesExhausted,
}

impl From<ConfigError> for WindowError {
    fn from(e: ConfigError) -> Self {
        WindowError::Config(e)
    }
}

/// Registry-assigned window handle
///
/// A registry never hands out the same handle twice, so a handle kept
/// after its window was destroyed can not reach a newer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowId(u32);

impl WindowId {
    /// Wrap a raw handle value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Window type, which drives layering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowKind {
    /// Ordinary application window
    #[default]
    Normal,
    /// Transient overlay, painted after the transparency mask
    Popup,
    /// Overlay that always stays on top of every other window
    Modal,
    /// Like Normal, inserted below any overlays
    Floating,
    /// Always at the bottom of the stack (wallpaper, status bars)
    FixedBottom,
}

impl WindowKind {
    /// Modal and Popup windows paint over the transparency mask
    pub fn is_overlay(&self) -> bool {
        matches!(self, WindowKind::Modal | WindowKind::Popup)
    }
}

/// Grayscale to binary conversion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DitherMode {
    /// Any non-zero value is on
    #[default]
    None,
    /// 4x4 Bayer threshold matrix
    Ordered,
    /// Floyd-Steinberg, mutating the display buffer in place
    ErrorDiffusion,
}

/// Parameters for registering a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowSpec {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Screen position, or `None` to cascade from the topmost window
    pub position: Option<(i16, i16)>,
    /// Layering type
    pub kind: WindowKind,
    /// Draw a one-pixel outline around the content
    pub border: bool,
    /// Dithering policy
    pub dither: DitherMode,
}

impl WindowSpec {
    /// Normal, borderless, undithered window with cascade placement
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            position: None,
            kind: WindowKind::Normal,
            border: false,
            dither: DitherMode::None,
        }
    }

    /// Place the window at a fixed screen position
    pub const fn at(mut self, x: i16, y: i16) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Set the layering type
    pub const fn kind(mut self, kind: WindowKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enable the border
    pub const fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    /// Set the dithering policy
    pub const fn dither(mut self, dither: DitherMode) -> Self {
        self.dither = dither;
        self
    }
}

/// Display-side state guarded by the window lock
#[derive(Debug)]
pub struct Surface {
    pixels: PixelBuffer,
    width: u16,
    height: u16,
    x: i16,
    y: i16,
    dither: DitherMode,
}

impl Surface {
    fn new(spec: &WindowSpec, x: i16, y: i16) -> Result<Self, WindowError> {
        Ok(Self {
            pixels: PixelBuffer::new(spec.width as usize * spec.height as usize)?,
            width: spec.width,
            height: spec.height,
            x,
            y,
            dither: spec.dither,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Rest position on screen (without animation offset)
    pub fn position(&self) -> (i16, i16) {
        (self.x, self.y)
    }

    /// Dithering policy
    pub fn dither(&self) -> DitherMode {
        self.dither
    }

    /// Screen rectangle, shifted down by `offset_y`
    pub fn bounds(&self, offset_y: i32) -> Rectangle {
        Rectangle::new(
            Point::new(self.x as i32, self.y as i32 + offset_y),
            Size::new(self.width as u32, self.height as u32),
        )
    }

    /// Snapshot taken at the last commit
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// Mutable snapshot (error diffusion writes here)
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.as_mut_slice()
    }

    /// Allocated display buffer capacity in pixels
    pub fn capacity(&self) -> usize {
        self.pixels.capacity()
    }
}

/// Shared half of a window
pub struct Window<M: RawMutex, const Q: usize = DEFAULT_EVENT_QUEUE_LEN> {
    id: WindowId,
    kind: WindowKind,
    border: bool,
    surface: Mutex<M, Surface>,
    events: Channel<M, KeyEvent, Q>,
    registered: AtomicBool,
}

impl<M: RawMutex, const Q: usize> Window<M, Q> {
    pub(crate) fn new(id: WindowId, spec: &WindowSpec, x: i16, y: i16) -> Result<Self, WindowError> {
        Ok(Self {
            id,
            kind: spec.kind,
            border: spec.border,
            surface: Mutex::new(Surface::new(spec, x, y)?),
            events: Channel::new(),
            registered: AtomicBool::new(true),
        })
    }

    /// Registry handle
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Layering type
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Check if a border is drawn around the content
    pub fn has_border(&self) -> bool {
        self.border
    }

    /// Lock the display-side state
    ///
    /// Held by `commit()` and by the renderer for the read + dither of one
    /// window; never across a whole render pass.
    pub async fn lock(&self) -> MutexGuard<'_, M, Surface> {
        self.surface.lock().await
    }

    /// Queue a key event, waiting while the queue is full
    ///
    /// There is no timeout: if the owner never drains the queue this
    /// waits forever.
    pub async fn push_event(&self, event: KeyEvent) {
        self.events.send(event).await;
    }

    /// Queue a key event without waiting; returns it back if the queue is full
    pub fn try_push_event(&self, event: KeyEvent) -> Result<(), KeyEvent> {
        self.events.try_send(event).map_err(|e| match e {
            embassy_sync::channel::TrySendError::Full(event) => event,
        })
    }

    /// Take the oldest queued event, or [`KeyEvent::IDLE`] if none
    pub fn pop_event(&self) -> KeyEvent {
        self.events.try_receive().unwrap_or(KeyEvent::IDLE)
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// False once the registry has removed the window
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub(crate) fn retire(&self) {
        self.registered.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type TestWindow = Window<CriticalSectionRawMutex, 3>;

    fn window(spec: WindowSpec) -> TestWindow {
        Window::new(WindowId::new(1), &spec, 4, 5).unwrap()
    }

    #[test]
    fn test_overlay_kinds() {
        assert!(WindowKind::Modal.is_overlay());
        assert!(WindowKind::Popup.is_overlay());
        assert!(!WindowKind::Normal.is_overlay());
        assert!(!WindowKind::Floating.is_overlay());
        assert!(!WindowKind::FixedBottom.is_overlay());
    }

    #[test]
    fn test_spec_builder() {
        let spec = WindowSpec::new(30, 20)
            .at(10, 12)
            .kind(WindowKind::Popup)
            .bordered()
            .dither(DitherMode::Ordered);
        assert_eq!(spec.position, Some((10, 12)));
        assert_eq!(spec.kind, WindowKind::Popup);
        assert!(spec.border);
        assert_eq!(spec.dither, DitherMode::Ordered);
    }

    #[test]
    fn test_new_window_surface() {
        let w = window(WindowSpec::new(6, 2).dither(DitherMode::ErrorDiffusion));
        let surface = block_on(w.lock());
        assert_eq!(surface.width(), 6);
        assert_eq!(surface.height(), 2);
        assert_eq!(surface.position(), (4, 5));
        assert_eq!(surface.dither(), DitherMode::ErrorDiffusion);
        assert_eq!(surface.pixels().len(), 12);
        assert_eq!(
            surface.bounds(3),
            Rectangle::new(Point::new(4, 8), Size::new(6, 2))
        );
    }

    #[test]
    fn test_pop_empty_returns_idle() {
        let w = window(WindowSpec::new(1, 1));
        assert_eq!(w.pop_event(), KeyEvent::IDLE);
        assert!(w.pop_event().is_idle());
    }

    #[test]
    fn test_events_are_fifo() {
        let w = window(WindowSpec::new(1, 1));
        block_on(w.push_event(KeyEvent::attack(1)));
        block_on(w.push_event(KeyEvent::release(1)));
        assert_eq!(w.pending_events(), 2);
        assert_eq!(w.pop_event(), KeyEvent::attack(1));
        assert_eq!(w.pop_event(), KeyEvent::release(1));
        assert_eq!(w.pop_event(), KeyEvent::IDLE);
    }

    #[test]
    fn test_try_push_reports_full_queue() {
        let w = window(WindowSpec::new(1, 1));
        for id in 0..3 {
            assert_eq!(w.try_push_event(KeyEvent::attack(id)), Ok(()));
        }
        assert_eq!(
            w.try_push_event(KeyEvent::attack(9)),
            Err(KeyEvent::attack(9))
        );

        // Draining one slot lets the next push through
        assert_eq!(w.pop_event(), KeyEvent::attack(0));
        assert_eq!(w.try_push_event(KeyEvent::attack(9)), Ok(()));
    }

    #[test]
    fn test_retire_clears_registered() {
        let w = window(WindowSpec::new(1, 1));
        assert!(w.is_registered());
        w.retire();
        assert!(!w.is_registered());
    }
}
