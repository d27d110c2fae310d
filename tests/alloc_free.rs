//! Allocation-free tick tests.
//!
//! These tests verify that `SoundSystem::tick()` does not allocate. Every
//! pool is saturated and fades are in flight so the overlay, fade-completion
//! and gain paths all run inside the guarded region.
//!
//! Runs under plain `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use cm_engine::{SoundSystem, VirtualDevices};
use cm_ir::ChannelMask;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_system(name: &str) -> SoundSystem {
    let manifest = cm_formats::load_config_file(fixtures_dir().join(name)).unwrap();
    SoundSystem::new(&manifest.config, manifest.clips, &mut VirtualDevices).unwrap()
}

/// Tick `sys` for `seconds` at 60 Hz, aborting on any heap allocation.
fn assert_tick_alloc_free(sys: &mut SoundSystem, seconds: u32) {
    assert_no_alloc(|| {
        for _ in 0..seconds * 60 {
            sys.tick(1.0 / 60.0);
        }
    });
}

#[test]
fn reference_session_alloc_free() {
    let mut sys = load_system("reference.ron");
    let boom = sys.find_clip("explosion").unwrap();
    let theme = sys.find_clip("theme").unwrap();
    let battle = sys.find_clip("battle").unwrap();
    let step = sys.find_clip("footstep").unwrap();

    for _ in 0..8 {
        sys.play_override(ChannelMask::EXPLOSIONS, boom, 1.0);
        sys.play_combined(ChannelMask::MOVEMENT, step, 1.0);
    }
    sys.play(ChannelMask::MUSIC, theme, 1.0, true);
    sys.transition(ChannelMask::MUSIC, battle, 1.0, 2.0, true);

    assert_tick_alloc_free(&mut sys, 5);
    assert!(sys.channel(ChannelMask::MUSIC).unwrap().fades().is_empty());
}

#[test]
fn paused_and_muted_alloc_free() {
    let mut sys = load_system("reference.ron");
    let theme = sys.find_clip("theme").unwrap();
    sys.play(ChannelMask::all(), theme, 1.0, true);
    sys.pause(ChannelMask::MUSIC);
    sys.mute_all();
    assert_tick_alloc_free(&mut sys, 2);
}

#[test]
fn empty_pool_alloc_free() {
    let mut sys = load_system("empty_pool.ron");
    let line = sys.find_clip("line").unwrap();
    sys.transition(ChannelMask::all(), line, 1.0, 0.5, false);
    assert_tick_alloc_free(&mut sys, 2);
}
