//! Integration test: drive a reference system through play, override,
//! overlay and transition commands and verify voices, fades and gain.

use approx::assert_abs_diff_eq;
use cm_engine::{SoundSystem, VirtualDevices};
use cm_ir::{ChannelMask, ClipKey, SILENCE_DB};

const DT: f32 = 1.0 / 60.0;

fn reference() -> SoundSystem {
    let manifest = cm_formats::reference_manifest();
    SoundSystem::new(&manifest.config, manifest.clips, &mut VirtualDevices).unwrap()
}

fn clip(sys: &SoundSystem, name: &str) -> ClipKey {
    sys.find_clip(name).unwrap_or_else(|| panic!("missing clip {}", name))
}

fn run(sys: &mut SoundSystem, seconds: f32) {
    let ticks = (seconds / DT).round() as usize;
    for _ in 0..ticks {
        sys.tick(DT);
    }
}

#[test]
fn music_crossfade_hands_over_cleanly() {
    let mut sys = reference();
    let theme = clip(&sys, "theme");
    let battle = clip(&sys, "battle");

    sys.play(ChannelMask::MUSIC, theme, 1.0, true);
    run(&mut sys, 1.0);
    sys.transition(ChannelMask::MUSIC, battle, 1.0, 2.0, true);

    run(&mut sys, 1.0);
    let music = sys.channel(ChannelMask::MUSIC).unwrap();
    let outgoing = music.pool().get(0).unwrap();
    assert_eq!(outgoing.clip(), Some(theme));
    assert!(outgoing.is_active());
    assert!(outgoing.volume() < 0.6 && outgoing.volume() > 0.4);
    assert!(!outgoing.is_looping());

    run(&mut sys, 1.5);
    let music = sys.channel(ChannelMask::MUSIC).unwrap();
    assert!(music.fades().is_empty());
    let outgoing = music.pool().get(0).unwrap();
    assert!(outgoing.is_idle());
    assert_eq!(outgoing.volume(), 1.0);
    let incoming = music.pool().get(1).unwrap();
    assert_eq!(incoming.clip(), Some(battle));
    assert!(incoming.is_active());
    assert_abs_diff_eq!(music.gain().gain_db(), 0.0, epsilon = 1e-6);
}

#[test]
fn explosion_burst_steals_soonest_to_finish() {
    let mut sys = reference();
    let boom = clip(&sys, "explosion");
    let spawn = clip(&sys, "spawn");

    for _ in 0..4 {
        assert_eq!(sys.play(ChannelMask::EXPLOSIONS, boom, 1.0, false), 1);
        run(&mut sys, 0.2);
    }
    // Voice 0 started first and is closest to its end.
    assert_eq!(sys.play(ChannelMask::EXPLOSIONS, boom, 1.0, false), 0);
    assert_eq!(sys.play_override(ChannelMask::EXPLOSIONS, spawn, 1.3), 1);
    let pool = sys.channel(ChannelMask::EXPLOSIONS).unwrap().pool();
    assert_eq!(pool.get(0).unwrap().clip(), Some(spawn));
    assert_eq!(pool.get(0).unwrap().pitch(), 1.3);
    assert_eq!(pool.active_count(), 4);
}

#[test]
fn overlay_keeps_voice_busy_without_retuning() {
    let mut sys = reference();
    let step = clip(&sys, "footstep");
    let theme = clip(&sys, "theme");

    for pitch in [0.8, 1.0, 1.3, 1.6] {
        sys.play(ChannelMask::MOVEMENT, theme, pitch, false);
    }
    assert_eq!(sys.play_combined(ChannelMask::MOVEMENT, step, 1.1), 1);
    let pool = sys.channel(ChannelMask::MOVEMENT).unwrap().pool();
    let pitches: Vec<f32> = pool.iter().map(|v| v.pitch()).collect();
    assert_eq!(pitches, [0.8, 1.0, 1.3, 1.6]);
    assert!(pool.iter().all(|v| v.clip() == Some(theme)));
}

#[test]
fn gain_tracks_occupancy_over_time() {
    let mut sys = reference();
    let boom = clip(&sys, "explosion");
    for _ in 0..3 {
        sys.play(ChannelMask::EXPLOSIONS, boom, 1.0, false);
    }
    sys.tick(DT);
    let explosions = sys.channel(ChannelMask::EXPLOSIONS).unwrap();
    assert_abs_diff_eq!(explosions.gain().gain_db(), -0.819, epsilon = 1e-3);
    assert_abs_diff_eq!(explosions.bus().master_db().unwrap(), -0.819, epsilon = 1e-3);

    run(&mut sys, 2.0);
    let explosions = sys.channel(ChannelMask::EXPLOSIONS).unwrap();
    assert_eq!(explosions.pool().active_count(), 0);
    assert_abs_diff_eq!(explosions.gain().gain_db(), 0.0, epsilon = 1e-6);
}

#[test]
fn master_slider_floors_at_silence() {
    let mut sys = reference();
    sys.set_master_volume(0.0001);
    sys.tick(DT);
    for ch in sys.channels() {
        assert_abs_diff_eq!(ch.gain().gain_db(), SILENCE_DB, epsilon = 1e-3);
    }
    sys.set_volume(ChannelMask::all(), 1.0);
    sys.tick(DT);
    assert!(sys.channels().all(|c| c.gain().gain_db() == 0.0));
}

#[test]
fn paused_voices_are_reused() {
    let mut sys = reference();
    let line = clip(&sys, "greeting");
    let click = clip(&sys, "click");
    assert_eq!(sys.play(ChannelMask::DIALOG, line, 1.0, false), 1);
    sys.pause(ChannelMask::DIALOG);
    run(&mut sys, 5.0);
    // A paused voice reports idle and is first in line.
    assert_eq!(sys.play(ChannelMask::DIALOG, click, 1.0, false), 1);
    let pool = sys.channel(ChannelMask::DIALOG).unwrap().pool();
    assert_eq!(pool.get(0).unwrap().clip(), Some(click));
}
