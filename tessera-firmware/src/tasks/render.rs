//! Render task
//!
//! Runs one compositor pass per render period: advances animations,
//! composites every window into the panel buffer and flushes the pages
//! that changed.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use crate::channels::{SharedManager, SharedPanel, FRAMES};

/// Log frame statistics every this many passes
const STATS_INTERVAL: u32 = 250;

#[embassy_executor::task]
pub async fn render_task(
    manager: &'static SharedManager,
    panel: &'static SharedPanel,
    period_ms: u32,
) {
    info!("Render task started ({} ms period)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        let now_ms = start.elapsed().as_millis() as u32;
        let result = manager.lock().await.render_pass(panel, now_ms).await;

        match result {
            Ok(stats) => {
                let frame = FRAMES.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                if stats.destroyed > 0 {
                    debug!("Destroyed {} window(s)", stats.destroyed);
                }
                if frame % STATS_INTERVAL == 0 {
                    debug!(
                        "Frame {}: {} windows, {} animating, {} fps",
                        frame, stats.windows, stats.animating, stats.fps
                    );
                }
            }
            Err(e) => warn!("Display flush failed: {:?}", Debug2Format(&e)),
        }
    }
}
