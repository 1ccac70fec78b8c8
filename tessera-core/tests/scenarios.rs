//! End-to-end compositor scenarios on the host

use embassy_futures::block_on;
use embassy_futures::join::join;
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use tessera_core::animation::Direction;
use tessera_core::render::dither::BAYER_4X4;
use tessera_core::{
    CompositorConfig, DitherMode, KeyEvent, MemorySink, WindowKind, WindowManager, WindowSpec,
};

type Manager = WindowManager<CriticalSectionRawMutex>;
type SinkLock = Mutex<CriticalSectionRawMutex, MemorySink>;

fn setup(width: u16, height: u16) -> (Manager, SinkLock) {
    let config = CompositorConfig::new().with_resolution(width, height);
    let manager = WindowManager::new(config).unwrap();
    let sink = Mutex::new(MemorySink::new(width, height).unwrap());
    (manager, sink)
}

fn finish_animations(manager: &mut Manager) {
    for _ in 0..24 {
        manager.update_animations();
    }
}

#[test]
fn test_ordered_dither_of_uniform_200() {
    let (mut manager, sink) = setup(128, 64);
    let mut canvas = block_on(
        manager.register(WindowSpec::new(30, 20).at(10, 10).dither(DitherMode::Ordered)),
    )
    .unwrap();
    canvas.fill(200);
    block_on(canvas.commit());
    finish_animations(&mut manager);

    block_on(manager.render_pass(&sink, 0)).unwrap();
    let mut sink = sink;
    let out = sink.get_mut();

    for y in 0..20 {
        for x in 0..30 {
            let expected = 200 > BAYER_4X4[y & 3][x & 3];
            assert_eq!(out.flushed_pixel(10 + x as i32, 10 + y as i32), expected);
        }
    }

    // Thresholds 208, 224 and 240 stay dark in every tile
    let tile_on = (0..4)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| out.flushed_pixel(10 + x, 10 + y))
        .count();
    assert_eq!(tile_on, 13);
    assert!(!out.flushed_pixel(9, 10));
    assert!(!out.flushed_pixel(40, 10));
}

#[test]
fn test_modal_sent_to_back_stays_on_top() {
    let (mut manager, _sink) = setup(128, 64);
    let normal = block_on(manager.register(WindowSpec::new(10, 10))).unwrap();
    let modal = block_on(manager.register(WindowSpec::new(10, 10).kind(WindowKind::Modal))).unwrap();

    manager.send_to_back(modal.id()).unwrap();
    let order: Vec<_> = manager.order().collect();
    assert_eq!(order, vec![normal.id(), modal.id()]);
    assert_eq!(manager.foreground().map(|w| w.id()), Some(modal.id()));
}

#[test]
fn test_fixed_bottom_cannot_move_up() {
    let (mut manager, _sink) = setup(128, 64);
    let wallpaper =
        block_on(manager.register(WindowSpec::new(128, 64).kind(WindowKind::FixedBottom))).unwrap();
    let app = block_on(manager.register(WindowSpec::new(10, 10))).unwrap();

    manager.move_up(wallpaper.id()).unwrap();
    let order: Vec<_> = manager.order().collect();
    assert_eq!(order, vec![wallpaper.id(), app.id()]);
}

#[test]
fn test_unregister_mid_entry_reverses_slide() {
    let config = CompositorConfig::new().with_animation_step(0.1);
    let mut manager: Manager = WindowManager::new(config).unwrap();
    let sink: SinkLock = Mutex::new(MemorySink::new(128, 64).unwrap());
    let canvas = block_on(manager.register(WindowSpec::new(16, 16).at(0, 0))).unwrap();
    let id = canvas.id();

    for _ in 0..3 {
        block_on(manager.render_pass(&sink, 0)).unwrap();
    }
    let entering = *manager.animation(id).unwrap();
    assert_eq!(entering.direction, Direction::Entering);
    assert!((entering.progress - 0.3).abs() < 1e-5);

    manager.unregister(id).unwrap();
    let exiting = *manager.animation(id).unwrap();
    assert_eq!(exiting.direction, Direction::Exiting);
    assert!((exiting.progress - 0.7).abs() < 1e-5);
    assert!(manager.is_pending(id));

    let mut passes = 0;
    while manager.contains(id) {
        let entry = *manager.animation(id).unwrap();
        assert!(entry.active);
        assert!(entry.progress < 1.0);
        block_on(manager.render_pass(&sink, 0)).unwrap();
        passes += 1;
        assert!(passes <= 4);
    }
    assert!(passes >= 3);
    assert!(!canvas.is_registered());
}

#[test]
fn test_error_diffusion_drifts_without_commit() {
    let (mut manager, _sink) = setup(8, 8);
    let mut out = MemorySink::new(8, 8).unwrap();
    let mut canvas = block_on(
        manager.register(WindowSpec::new(2, 1).at(0, 0).dither(DitherMode::ErrorDiffusion)),
    )
    .unwrap();
    canvas.write_pixel(0, 0, 100);
    canvas.write_pixel(1, 0, 100);
    block_on(canvas.commit());
    finish_animations(&mut manager);

    block_on(manager.compose(&mut out));
    assert!(!out.pixel(0, 0));
    assert!(out.pixel(1, 0));
    assert_eq!(block_on(canvas.window().lock()).pixels(), &[100, 143]);

    // The carried error accumulates pass after pass
    block_on(manager.compose(&mut out));
    assert_eq!(block_on(canvas.window().lock()).pixels(), &[100, 186]);

    // A fresh commit resets it
    block_on(canvas.commit());
    assert_eq!(block_on(canvas.window().lock()).pixels(), &[100, 100]);
}

#[test]
fn test_later_windows_overdraw_earlier_ones() {
    let (mut manager, sink) = setup(16, 16);
    let mut below = block_on(manager.register(WindowSpec::new(8, 8).at(0, 0))).unwrap();
    let above = block_on(manager.register(WindowSpec::new(4, 4).at(2, 2))).unwrap();
    below.fill(255);
    block_on(below.commit());
    finish_animations(&mut manager);

    block_on(manager.render_pass(&sink, 0)).unwrap();
    let out = block_on(sink.lock());
    assert_eq!(out.lit_count(), 64 - 16);
    assert!(!out.pixel(3, 3));
    assert!(out.pixel(1, 1));
    drop(above);
}

#[test]
fn test_blocked_key_push_resumes_when_drained() {
    let config = CompositorConfig::new();
    let mut manager: WindowManager<CriticalSectionRawMutex, 2> = WindowManager::new(config).unwrap();
    let canvas = block_on(manager.register(WindowSpec::new(4, 4))).unwrap();

    let manager = &manager;
    let ((), received) = block_on(join(
        async {
            for id in 0..5 {
                assert!(manager.push_key_event(KeyEvent::attack(id)).await);
            }
        },
        async {
            let mut received = Vec::new();
            while received.len() < 5 {
                let event = canvas.pop_event();
                if event.is_idle() {
                    yield_now().await;
                } else {
                    received.push(event.id);
                }
            }
            received
        },
    ));
    assert_eq!(received, vec![0, 1, 2, 3, 4]);
}
