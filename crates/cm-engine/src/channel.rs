//! Channel: one logical sound category with its voices, gain and fades.

use cm_ir::{ChannelDescriptor, ChannelMask, Clip, ClipKey};
use log::trace;

use crate::device::{DeviceFactory, MasterBus, PlaybackDevice};
use crate::fade::FadeScheduler;
use crate::gain::GainController;
use crate::voice::VoiceId;
use crate::voice_pool::{Allocation, VoicePool};

/// Point-in-time view of a channel, for hosts and diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSnapshot {
    pub identity: ChannelMask,
    pub label: String,
    pub voices: usize,
    pub active: usize,
    pub fading: usize,
    pub slider: f32,
    pub gain_db: f32,
}

/// A channel's full mixing state.
pub struct Channel {
    identity: ChannelMask,
    label: String,
    mixer: String,
    pool: VoicePool,
    gain: GainController,
    fades: FadeScheduler,
    bus: Box<dyn MasterBus>,
}

impl Channel {
    /// Build a channel from its descriptor, creating its devices through `factory`.
    ///
    /// The reference level is read from the bus once, falling back to the
    /// descriptor when the bus cannot report one.
    pub fn new(descriptor: &ChannelDescriptor, fade_step: f32, factory: &mut dyn DeviceFactory) -> Self {
        let devices: Vec<Box<dyn PlaybackDevice>> = (0..descriptor.voices)
            .map(|i| factory.create_source(descriptor, i))
            .collect();
        let bus = factory.create_bus(descriptor);
        let reference_db = bus.master_db().unwrap_or(descriptor.reference_db);
        Self {
            identity: descriptor.identity,
            label: descriptor.label.clone(),
            mixer: descriptor.mixer.clone(),
            pool: VoicePool::new(devices),
            gain: GainController::new(reference_db),
            fades: FadeScheduler::new(fade_step, descriptor.voices),
            bus,
        }
    }

    pub fn identity(&self) -> ChannelMask {
        self.identity
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mixer(&self) -> &str {
        &self.mixer
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn gain(&self) -> &GainController {
        &self.gain
    }

    pub fn fades(&self) -> &FadeScheduler {
        &self.fades
    }

    pub fn bus(&self) -> &dyn MasterBus {
        self.bus.as_ref()
    }

    /// True if this channel's identity is selected by `mask`.
    pub fn matches(&self, mask: ChannelMask) -> bool {
        self.identity.matches(mask)
    }

    /// Start `clip` on an idle voice, if any.
    pub fn play(&mut self, key: ClipKey, clip: &Clip, pitch: f32, looping: bool) -> Option<VoiceId> {
        let id = self.pool.allocate(key, clip, pitch, looping)?;
        self.claim(id);
        Some(id)
    }

    /// Start `clip`, stealing the voice closest to finishing if none is idle.
    pub fn play_override(&mut self, key: ClipKey, clip: &Clip, pitch: f32, looping: bool) -> Option<Allocation> {
        let alloc = self.pool.allocate_override(key, clip, pitch, looping)?;
        self.claim(alloc.voice());
        Some(alloc)
    }

    /// Start `clip`, overlaying it on the closest-pitched voice if none is idle.
    pub fn play_combined(&mut self, key: ClipKey, clip: &Clip, pitch: f32) -> Option<Allocation> {
        let alloc = self.pool.allocate_closest_pitch(key, clip, pitch)?;
        if let Allocation::Idle(id) = alloc {
            self.claim(id);
        }
        Some(alloc)
    }

    /// Start `clip` through override allocation and fade every other voice
    /// out over `seconds`. Returns the voice now playing `clip`.
    pub fn transition(&mut self, key: ClipKey, clip: &Clip, pitch: f32, seconds: f32, looping: bool) -> Option<VoiceId> {
        let kept = self.play_override(key, clip, pitch, looping)?.voice();
        for id in self.pool.others(kept) {
            if let Some(voice) = self.pool.get_mut(id) {
                voice.set_looping(false);
                self.fades.start(id, voice.volume(), seconds);
            }
        }
        Some(kept)
    }

    /// A reused voice belongs to the new request; any fade on it is dropped.
    fn claim(&mut self, id: VoiceId) {
        if self.fades.cancel(id) {
            trace!("{}: voice {} reallocated mid-fade", self.label, id);
        }
    }

    pub fn mute(&mut self) {
        self.pool.mute_all();
    }

    pub fn unmute(&mut self) {
        self.pool.unmute_all();
    }

    pub fn pause(&mut self) {
        self.pool.pause_all();
    }

    pub fn resume(&mut self) {
        self.pool.resume_all();
    }

    /// Set every voice's volume.
    pub fn set_volume(&mut self, level: f32) {
        self.pool.set_volume_all(level);
    }

    /// Move the master slider and push the new level to the bus.
    pub fn set_slider(&mut self, level: f32) {
        let db = self.gain.set_slider(level);
        self.bus.set_master_db(db);
    }

    /// Hand a host-created source to this channel's pool.
    pub fn add_source(&mut self, device: Box<dyn PlaybackDevice>) -> VoiceId {
        self.pool.push_external(device)
    }

    /// Advance devices and fades, then recompute the master level.
    pub fn tick(&mut self, dt: f32) {
        self.pool.advance(dt);
        let completed = self.fades.advance(dt, &mut self.pool);
        if completed > 0 {
            trace!("{}: {} fade(s) completed", self.label, completed);
        }
        let db = self.gain.recompute(self.pool.active_count());
        self.bus.set_master_db(db);
    }

    /// Drop pending fades and stop every voice.
    pub fn stop_all(&mut self) {
        self.fades.clear();
        self.pool.stop_all();
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            identity: self.identity,
            label: self.label.clone(),
            voices: self.pool.len(),
            active: self.pool.active_count(),
            fading: self.fades.len(),
            slider: self.gain.slider(),
            gain_db: self.gain.gain_db(),
        }
    }
}

impl core::fmt::Debug for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("identity", &self.identity)
            .field("label", &self.label)
            .field("mixer", &self.mixer)
            .field("pool", &self.pool)
            .field("gain", &self.gain)
            .field("fades", &self.fades)
            .finish()
    }
}
