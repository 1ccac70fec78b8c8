//! Demo producer tasks
//!
//! Each task owns one window's canvas and redraws it at the render rate:
//!
//! - `background_task`: scrolling checker stripes, pinned to the bottom
//! - `bouncer_task`: bordered text window bouncing off the screen edges,
//!   occasionally shuffled in the stack
//! - `pulse_task`: grayscale square pulsing through the ordered dither
//! - `dialog_task`: modal pause dialog opened by key 0

use defmt::*;
use embassy_time::{Duration, Ticker, Timer};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use tessera_core::{DitherMode, KeyEvent, KeyStatus, WindowKind, WindowSpec};

use crate::channels::{DemoCanvas, SharedManager, DIALOG_REQUEST};

/// Frames between z-order shuffles of the bouncer
const SHUFFLE_INTERVAL: u32 = 40;

/// Key that opens and dismisses the dialog
const KEY_DIALOG: u8 = 0;

/// Key that raises the receiving window
const KEY_RAISE: u8 = 1;

/// How often the dialog polls its queue
const DIALOG_POLL_MS: u64 = 50;

/// Minimal xorshift PRNG for the shuffle decisions
struct XorShift32(u32);

impl XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// Triangle wave from 0 up to 255 and back over `period` frames
fn triangle(frame: u32, period: u32) -> u8 {
    let half = (period / 2).max(1);
    let phase = frame % (half * 2);
    let level = if phase < half { phase } else { half * 2 - phase };
    (level * 255 / half) as u8
}

/// Register a window, logging failures
async fn open(manager: &'static SharedManager, spec: WindowSpec) -> Option<DemoCanvas> {
    match manager.lock().await.register(spec).await {
        Ok(canvas) => {
            debug!("Registered window {} ({})", canvas.id(), spec.kind);
            Some(canvas)
        }
        Err(e) => {
            error!("Window registration failed: {}", e);
            None
        }
    }
}

/// React to queued key presses on a regular window
async fn handle_keys(manager: &'static SharedManager, canvas: &DemoCanvas) {
    loop {
        let KeyEvent { id, status } = canvas.pop_event();
        match (id, status) {
            (_, KeyStatus::Idle) => return,
            (KEY_DIALOG, KeyStatus::Attack) => DIALOG_REQUEST.signal(()),
            (KEY_RAISE, KeyStatus::Attack) => {
                let _ = manager.lock().await.bring_to_front(canvas.id());
            }
            _ => {}
        }
    }
}

#[embassy_executor::task]
pub async fn background_task(manager: &'static SharedManager, period_ms: u32) {
    let spec = WindowSpec::new(128, 64)
        .at(0, 0)
        .kind(WindowKind::FixedBottom)
        .dither(DitherMode::Ordered);
    let Some(mut canvas) = open(manager, spec).await else {
        return;
    };
    info!("Background task started");

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let mut scroll: i32 = 0;

    loop {
        for y in 0..height {
            for x in 0..width {
                let stripe = ((x + scroll) / 8 + y / 8) % 2 == 0;
                canvas.write_pixel(x, y, if stripe { 48 } else { 0 });
            }
        }
        canvas.commit().await;
        handle_keys(manager, &canvas).await;

        scroll = (scroll + 1) % 16;
        ticker.next().await;
    }
}

#[embassy_executor::task]
pub async fn bouncer_task(manager: &'static SharedManager, period_ms: u32) {
    let spec = WindowSpec::new(48, 16).at(10, 10).bordered();
    let Some(mut canvas) = open(manager, spec).await else {
        return;
    };
    info!("Bouncer task started");

    let style = MonoTextStyle::new(&FONT_6X10, Gray8::WHITE);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center = Point::new(canvas.width() as i32 / 2, canvas.height() as i32 / 2);

    canvas.fill(0);
    let _ = Text::with_text_style("tessera", center, style, text_style).draw(&mut canvas);
    canvas.commit().await;

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));
    let mut rng = XorShift32(0x2545_F491);
    let max_x = 128 - canvas.width() as i16;
    let max_y = 64 - canvas.height() as i16;
    let (mut x, mut y): (i16, i16) = (10, 10);
    let (mut dx, mut dy): (i16, i16) = (1, 1);
    let mut frame: u32 = 0;

    loop {
        x += dx;
        y += dy;
        if x <= 0 || x >= max_x {
            dx = -dx;
        }
        if y <= 0 || y >= max_y {
            dy = -dy;
        }
        canvas.set_position(x.clamp(0, max_x), y.clamp(0, max_y)).await;
        handle_keys(manager, &canvas).await;

        frame = frame.wrapping_add(1);
        if frame % SHUFFLE_INTERVAL == 0 {
            let mut mgr = manager.lock().await;
            let moved = if rng.next_u32() % 4 == 0 {
                mgr.send_to_back(canvas.id())
            } else {
                mgr.move_up(canvas.id())
            };
            if moved.is_err() {
                warn!("Bouncer lost its window");
            }
        }

        ticker.next().await;
    }
}

#[embassy_executor::task]
pub async fn pulse_task(manager: &'static SharedManager, period_ms: u32) {
    let spec = WindowSpec::new(24, 24)
        .at(96, 32)
        .kind(WindowKind::Floating)
        .bordered()
        .dither(DitherMode::Ordered);
    let Some(mut canvas) = open(manager, spec).await else {
        return;
    };
    info!("Pulse task started");

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));
    let mut frame: u32 = 0;

    loop {
        canvas.fill(triangle(frame, 64));
        canvas.commit().await;
        handle_keys(manager, &canvas).await;

        frame = frame.wrapping_add(1);
        ticker.next().await;
    }
}

#[embassy_executor::task]
pub async fn dialog_task(manager: &'static SharedManager) {
    info!("Dialog task started");

    let style = MonoTextStyle::new(&FONT_6X10, Gray8::WHITE);

    loop {
        DIALOG_REQUEST.wait().await;

        let spec = WindowSpec::new(72, 24).at(28, 20).kind(WindowKind::Modal).bordered();
        let Some(mut canvas) = open(manager, spec).await else {
            continue;
        };

        canvas.fill(0);
        let _ = Text::with_baseline("PAUSED", Point::new(18, 2), style, Baseline::Top)
            .draw(&mut canvas);
        let _ = Text::with_baseline("press key", Point::new(9, 12), style, Baseline::Top)
            .draw(&mut canvas);
        canvas.commit().await;

        // The modal is now the foreground window and receives every key
        loop {
            Timer::after(Duration::from_millis(DIALOG_POLL_MS)).await;
            if canvas.pop_event().status == KeyStatus::Attack {
                break;
            }
        }

        if let Err(e) = manager.lock().await.unregister(canvas.id()) {
            warn!("Dialog close failed: {}", e);
        }
        // Requests raised while the dialog was open are stale
        DIALOG_REQUEST.reset();
    }
}

