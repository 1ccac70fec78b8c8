//! Tessera - Window Compositor Demo Firmware
//!
//! Runs the compositor on an RP2350 with a 128x64 SH1106 OLED on I2C0
//! and two push buttons. Several producer tasks draw into their own
//! windows while the render task composites them at a fixed rate.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;
use embedded_alloc::LlffHeap as Heap;
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tessera_core::config::parse_config;
use tessera_core::{CompositorConfig, WindowManager};
use tessera_display::{BufferedPanel, Controller, Ssd1306};

use crate::channels::{Panel, SharedManager, SharedPanel, FRAMES, PANEL_PAGES, PANEL_WIDTH};

mod channels;
mod tasks;

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

// Heap for window buffers
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 64KB
const HEAP_SIZE: usize = 64 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit compositor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../compositor.toml");

/// I2C clock for the OLED
const I2C_FREQUENCY_HZ: u32 = 400_000;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

static MANAGER: StaticCell<SharedManager> = StaticCell::new();
static PANEL: StaticCell<SharedPanel> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tessera firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // OLED on I2C0 (SDA=GPIO4, SCL=GPIO5)
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);

    let mut panel: Panel = BufferedPanel::new(Ssd1306::new(i2c, Controller::Sh1106));
    if let Err(e) = panel.init().await {
        error!("Display init failed: {:?}", Debug2Format(&e));
    } else {
        info!("Display initialized");
    }

    let manager = match WindowManager::new(config) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Compositor config rejected: {}, using defaults", e);
            unwrap!(WindowManager::new(default_config()))
        }
    };
    let period_ms = manager.config().render_period_ms;

    let manager: &'static SharedManager = MANAGER.init(Mutex::new(manager));
    let panel: &'static SharedPanel = PANEL.init(Mutex::new(panel));

    // Buttons to ground (key 0 = GPIO14, key 1 = GPIO15)
    let key0 = Input::new(p.PIN_14, Pull::Up);
    let key1 = Input::new(p.PIN_15, Pull::Up);

    spawner.spawn(unwrap!(tasks::render_task(manager, panel, period_ms)));
    spawner.spawn(unwrap!(tasks::background_task(manager, period_ms)));
    spawner.spawn(unwrap!(tasks::bouncer_task(manager, period_ms)));
    spawner.spawn(unwrap!(tasks::pulse_task(manager, period_ms)));
    spawner.spawn(unwrap!(tasks::dialog_task(manager)));
    spawner.spawn(unwrap!(tasks::button_task(key0, 0, manager)));
    spawner.spawn(unwrap!(tasks::button_task(key1, 1, manager)));

    info!("All tasks spawned, compositor running");

    loop {
        Timer::after_secs(60).await;
        debug!("Heartbeat: {} frames", FRAMES.load(Ordering::Relaxed));
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded configuration
///
/// The resolution always follows the attached panel.
fn load_config() -> CompositorConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates the file, so this only happens when the
            // firmware parser and the build-time check disagree
            warn!("Failed to parse embedded config: {}", e);
            CompositorConfig::default()
        }
    };

    let (width, height) = (PANEL_WIDTH as u16, (PANEL_PAGES * 8) as u16);
    if (config.width, config.height) != (width, height) {
        warn!(
            "Configured resolution {}x{} does not match the panel, using {}x{}",
            config.width, config.height, width, height
        );
    }
    config.with_resolution(width, height)
}

fn default_config() -> CompositorConfig {
    CompositorConfig::default().with_resolution(PANEL_WIDTH as u16, (PANEL_PAGES * 8) as u16)
}
