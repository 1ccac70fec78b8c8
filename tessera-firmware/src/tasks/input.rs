//! Push-button input
//!
//! Each button is debounced and turned into key press/release events for
//! the foreground window. Holding key 1 toggles the frame rate overlay.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use tessera_core::KeyEvent;

use crate::channels::SharedManager;

/// Debounce delay after an edge
const DEBOUNCE_MS: u64 = 20;

/// Holding longer than this is a long press
const LONG_PRESS_MS: u64 = 500;

/// Key whose long press toggles the FPS overlay
const KEY_FPS: u8 = 1;

/// Deliver `event` to the current foreground window
///
/// The registry lock is released before waiting on a full queue, so the
/// render task keeps running while the consumer catches up.
async fn route(manager: &'static SharedManager, event: KeyEvent) {
    let target = manager.lock().await.foreground();
    match target {
        Some(window) => window.push_event(event).await,
        None => debug!("No window for key {}", event.id),
    }
}

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(mut btn: Input<'static>, key: u8, manager: &'static SharedManager) {
    info!("Button task started (key {})", key);

    loop {
        btn.wait_for_falling_edge().await;
        let pressed_at = Instant::now();

        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if btn.is_high() {
            continue;
        }

        route(manager, KeyEvent::attack(key)).await;

        let released = with_timeout(
            Duration::from_millis(LONG_PRESS_MS),
            btn.wait_for_rising_edge(),
        )
        .await;

        if released.is_err() {
            if key == KEY_FPS {
                let mut mgr = manager.lock().await;
                let show = !mgr.show_fps();
                mgr.set_show_fps(show);
                info!("FPS overlay {}", if show { "on" } else { "off" });
            }
            btn.wait_for_rising_edge().await;
        }

        debug!("Key {} held {} ms", key, pressed_at.elapsed().as_millis());
        route(manager, KeyEvent::release(key)).await;

        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
    }
}
