//! Integration tests for the manifest loader against fixture files.

use cm_formats::{load_config_file, reference_manifest, FormatError, Manifest};
use cm_ir::ChannelMask;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures")
}

fn load_fixture(name: &str) -> Manifest {
    let path = fixtures_dir().join(name);
    load_config_file(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

#[test]
fn reference_fixture_matches_builtin_clips() {
    let m = load_fixture("reference.ron");
    assert_eq!(m.config.channels.len(), 6);
    assert_eq!(m.config.identities(), ChannelMask::all());
    assert_eq!(m.clips, reference_manifest().clips);

    let music = &m.config.channels[3];
    assert_eq!(music.identity, ChannelMask::MUSIC);
    assert_eq!(music.voices, 2);
    assert_eq!(music.reference_db, -2.0);
}

#[test]
fn empty_pool_fixture() {
    let m = load_fixture("empty_pool.ron");
    assert_eq!(m.config.fade_step, 0.05);
    assert_eq!(m.config.channels[0].voices, 0);
    assert_eq!(m.clips.len(), 1);
}

#[test]
fn duplicate_identity_still_parses() {
    // Identity rules are enforced when the system is built.
    let m = load_fixture("duplicate_identity.ron");
    assert_eq!(m.config.channels.len(), 2);
}

#[test]
fn bad_clip_fixture_is_rejected() {
    let err = load_config_file(fixtures_dir().join("bad_clip.ron")).unwrap_err();
    match err {
        FormatError::InvalidClipLength { name, length } => {
            assert_eq!(name, "broken");
            assert_eq!(length, -4.0);
        }
        other => panic!("unexpected error: {}", other),
    }
}
