//! Shared state between Embassy tasks
//!
//! The window manager and the panel each sit behind an async mutex so that
//! producer, input and render tasks can reach them from separate tasks.

use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use tessera_core::{Canvas, WindowManager};
use tessera_display::{BufferedPanel, Ssd1306};

/// Panel width in pixels
pub const PANEL_WIDTH: usize = 128;

/// Panel height in 8-pixel pages
pub const PANEL_PAGES: usize = 8;

/// OLED on I2C0
pub type Panel = BufferedPanel<Ssd1306<I2c<'static, I2C0, Async>>, PANEL_WIDTH, PANEL_PAGES>;

/// Compositor shared by every task
pub type SharedManager = Mutex<CriticalSectionRawMutex, WindowManager<CriticalSectionRawMutex>>;

/// Output sink shared with the render task
pub type SharedPanel = Mutex<CriticalSectionRawMutex, Panel>;

/// Producer half of a window on this board
pub type DemoCanvas = Canvas<CriticalSectionRawMutex>;

/// Frames flushed since boot
pub static FRAMES: AtomicU32 = AtomicU32::new(0);

/// Request to open the pause dialog
pub static DIALOG_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();
