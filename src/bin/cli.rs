//! channelmix CLI: runs a scripted mixing session and prints channel state.
//!
//! Usage:
//!   cm-cli [manifest.ron]              scripted session on in-memory devices
//!   cm-cli [manifest.ron] --realtime   same script, ticked by the background thread
//!   cm-cli --dump                      print the reference manifest as RON
//!
//! Set RUST_LOG=debug to see every command the engine ignores.

use anyhow::Context;
use cm_master::{ChannelMask, ChannelSnapshot, Controller, SoundSystem, DEFAULT_TICK_HZ};
use log::{info, warn, LevelFilter};
use std::env;
use std::time::Duration;

const SESSION_SECONDS: u32 = 6;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--dump") {
        let text = cm_formats::to_ron(&cm_formats::reference_manifest())?;
        println!("{}", text);
        return Ok(());
    }

    let realtime = args.iter().any(|a| a == "--realtime");
    let mut ctrl = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => Controller::load_file(path)?,
        None => Controller::reference().context("building reference system")?,
    };

    print_header(&ctrl.snapshot());

    if realtime {
        run_realtime(&mut ctrl);
    } else {
        run_scripted(&ctrl);
    }

    ctrl.shutdown()
}

/// Commands issued at the start of second `at` of the session.
fn cue(sys: &mut SoundSystem, at: u32) {
    let clip = |sys: &SoundSystem, name: &str| {
        let key = sys.find_clip(name);
        if key.is_none() {
            warn!("clip '{}' not in manifest, cue skipped", name);
        }
        key
    };

    match at {
        0 => {
            if let Some(theme) = clip(sys, "theme") {
                sys.play(ChannelMask::MUSIC, theme, 1.0, true);
            }
            if let Some(boom) = clip(sys, "explosion") {
                for pitch in [0.9, 1.0, 1.1, 1.2, 0.8] {
                    sys.play_override(ChannelMask::EXPLOSIONS, boom, pitch);
                }
            }
        }
        1 => {
            if let Some(step) = clip(sys, "footstep") {
                for _ in 0..3 {
                    sys.play_combined(ChannelMask::MOVEMENT | ChannelMask::INTERACTIONS, step, 1.0);
                }
            }
            if let Some(line) = clip(sys, "greeting") {
                sys.play(ChannelMask::DIALOG, line, 1.0, false);
            }
        }
        2 => {
            if let Some(battle) = clip(sys, "battle") {
                sys.transition(ChannelMask::MUSIC, battle, 1.0, 1.5, true);
            }
        }
        3 => sys.set_volume(ChannelMask::all(), 0.8),
        4 => sys.mute(ChannelMask::EXPLOSIONS),
        _ => {}
    }
}

fn run_scripted(ctrl: &Controller) {
    let dt = 1.0 / DEFAULT_TICK_HZ as f32;
    for second in 0..SESSION_SECONDS {
        cue(&mut ctrl.lock(), second);
        for _ in 0..DEFAULT_TICK_HZ {
            ctrl.tick(dt);
        }
        print_row(second + 1, &ctrl.snapshot());
    }
}

fn run_realtime(ctrl: &mut Controller) {
    ctrl.start(DEFAULT_TICK_HZ);
    let handle = ctrl.handle();
    for second in 0..SESSION_SECONDS {
        handle.with(|sys| cue(sys, second));
        std::thread::sleep(Duration::from_secs(1));
        print_row(second + 1, &ctrl.snapshot());
    }
    ctrl.stop();
    info!("{} ticks in {} s", ctrl.ticks(), SESSION_SECONDS);
}

fn print_header(channels: &[ChannelSnapshot]) {
    print!("  t ");
    for ch in channels {
        print!("| {:<18}", ch.label);
    }
    println!();
}

fn print_row(second: u32, channels: &[ChannelSnapshot]) {
    print!("{:>2}s ", second);
    for ch in channels {
        let cell = format!("{}/{} f{} {:+.1}dB", ch.active, ch.voices, ch.fading, ch.gain_db);
        print!("| {:<18}", cell);
    }
    println!();
}
