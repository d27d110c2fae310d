//! Integration test: load manifest fixture → build system → check channel layout.

use cm_engine::{ConfigurationError, SoundSystem, VirtualDevices};
use cm_ir::ChannelMask;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn build(name: &str) -> Result<SoundSystem, ConfigurationError> {
    let manifest = cm_formats::load_config_file(fixtures_dir().join(name)).unwrap();
    SoundSystem::new(&manifest.config, manifest.clips, &mut VirtualDevices)
}

#[test]
fn reference_fixture_builds_every_channel() {
    let sys = build("reference.ron").unwrap();
    assert_eq!(sys.registry().identities(), ChannelMask::all());
    let labels: Vec<_> = sys.channels().map(|c| c.label().to_string()).collect();
    assert_eq!(
        labels,
        ["Explosion", "Instantiation", "Movement", "Music", "Interaction", "Dialog"]
    );
    assert_eq!(sys.clips().count(), 7);
}

#[test]
fn reference_level_comes_from_descriptor() {
    let sys = build("reference.ron").unwrap();
    let music = sys.channel(ChannelMask::MUSIC).unwrap();
    assert_eq!(music.gain().reference_db(), -2.0);
    assert_eq!(music.mixer(), "Mixers/Music");
    assert_eq!(sys.channel(ChannelMask::DIALOG).unwrap().gain().reference_db(), 0.0);
}

#[test]
fn duplicate_identity_fixture_is_rejected() {
    let err = build("duplicate_identity.ron").unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateIdentity { label: "Score".into(), identity: ChannelMask::MUSIC }
    );
    assert_eq!(err.to_string(), "channel 'Score' reuses identity 'MUSIC'");
}

#[test]
fn empty_pool_channel_accepts_commands() {
    let mut sys = build("empty_pool.ron").unwrap();
    assert_eq!(sys.fade_step(), 0.05);
    let line = sys.find_clip("line").unwrap();
    assert_eq!(sys.play(ChannelMask::DIALOG, line, 1.0, false), 0);
    assert_eq!(sys.play_override(ChannelMask::DIALOG, line, 1.0), 0);
    assert_eq!(sys.play_combined(ChannelMask::DIALOG, line, 1.0), 0);
    assert_eq!(sys.transition(ChannelMask::DIALOG, line, 1.0, 1.0, false), 0);
    assert_eq!(sys.play(ChannelMask::all(), line, 1.0, false), 1);
}
