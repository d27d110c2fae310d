//! In-memory playback devices driven by the engine tick.
//!
//! Used by headless hosts and tests. A `VirtualSource` keeps a playhead in
//! clip time and advances it by `dt * pitch` on every tick.

use arrayvec::ArrayVec;
use cm_ir::{ChannelDescriptor, Clip, ClipKey};

use crate::device::{DeviceFactory, MasterBus, PlaybackDevice};

/// Maximum simultaneous one-shot overlays per source.
pub const MAX_ONE_SHOTS: usize = 8;

/// Simulated playback source.
#[derive(Clone, Debug)]
pub struct VirtualSource {
    clip: Option<ClipKey>,
    /// Assigned clip length in seconds.
    length: f32,
    /// Playhead in clip seconds.
    position: f32,
    pitch: f32,
    looping: bool,
    playing: bool,
    paused: bool,
    volume: f32,
    muted: bool,
    /// Remaining clip seconds of each overlaid one-shot.
    one_shots: ArrayVec<f32, MAX_ONE_SHOTS>,
}

impl VirtualSource {
    pub fn new() -> Self {
        Self {
            clip: None,
            length: 0.0,
            position: 0.0,
            pitch: 1.0,
            looping: false,
            playing: false,
            paused: false,
            volume: 1.0,
            muted: false,
            one_shots: ArrayVec::new(),
        }
    }

    pub fn clip(&self) -> Option<ClipKey> {
        self.clip
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of one-shots still sounding.
    pub fn one_shot_count(&self) -> usize {
        self.one_shots.len()
    }

    fn sounding(&self) -> bool {
        self.playing || !self.one_shots.is_empty()
    }
}

impl Default for VirtualSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDevice for VirtualSource {
    fn assign(&mut self, key: ClipKey, clip: &Clip) {
        self.clip = Some(key);
        self.length = clip.length;
        self.position = 0.0;
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn play(&mut self) {
        if self.clip.is_some() {
            self.playing = true;
            self.paused = false;
            self.position = 0.0;
        }
    }

    fn play_one_shot(&mut self, _key: ClipKey, clip: &Clip) {
        if self.one_shots.is_full() {
            self.one_shots.remove(0);
        }
        self.one_shots.push(clip.length);
        self.paused = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.position = 0.0;
        self.one_shots.clear();
    }

    fn pause(&mut self) {
        if self.sounding() {
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_playing(&self) -> bool {
        !self.paused && self.sounding()
    }

    fn remaining_time(&self) -> f32 {
        if self.playing {
            (self.length - self.position).max(0.0)
        } else {
            0.0
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let step = dt * self.pitch.max(0.0);

        if self.playing {
            self.position += step;
            if self.position >= self.length {
                if self.looping && self.length > 0.0 {
                    self.position %= self.length;
                } else {
                    self.playing = false;
                    self.position = 0.0;
                }
            }
        }

        for remaining in self.one_shots.iter_mut() {
            *remaining -= step;
        }
        self.one_shots.retain(|r| *r > 0.0);
    }
}

/// Simulated mixer bus that remembers the last level written.
#[derive(Clone, Debug, Default)]
pub struct VirtualBus {
    db: f32,
}

impl VirtualBus {
    pub fn new(db: f32) -> Self {
        Self { db }
    }

    pub fn db(&self) -> f32 {
        self.db
    }
}

impl MasterBus for VirtualBus {
    fn master_db(&self) -> Option<f32> {
        Some(self.db)
    }

    fn set_master_db(&mut self, db: f32) {
        self.db = db;
    }
}

/// Factory producing `VirtualSource`s and `VirtualBus`es.
///
/// Each bus starts at the descriptor's `reference_db`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualDevices;

impl DeviceFactory for VirtualDevices {
    fn create_source(&mut self, _channel: &ChannelDescriptor, _index: usize) -> Box<dyn PlaybackDevice> {
        Box::new(VirtualSource::new())
    }

    fn create_bus(&mut self, channel: &ChannelDescriptor) -> Box<dyn MasterBus> {
        Box::new(VirtualBus::new(channel.reference_db))
    }
}
