//! The top-level sound system: channels, clip bank and command fan-out.

use cm_ir::{ChannelMask, Clip, ClipKey, SystemConfig};
use log::{debug, info, warn};
use slotmap::SlotMap;

use crate::channel::{Channel, ChannelSnapshot};
use crate::device::{DeviceFactory, PlaybackDevice};
use crate::error::ConfigurationError;
use crate::registry::ChannelRegistry;
use crate::voice::VoiceId;

/// Owns every channel and the clips they play.
///
/// Commands are addressed by [`ChannelMask`] and fan out to every channel
/// whose identity intersects the mask. Masks that match nothing and unknown
/// clip keys are no-ops. Only construction can fail.
#[derive(Debug)]
pub struct SoundSystem {
    registry: ChannelRegistry,
    clips: SlotMap<ClipKey, Clip>,
    fade_step: f32,
}

impl SoundSystem {
    /// Validate `config`, create every channel's devices through `factory`
    /// and load `clips` into the bank.
    pub fn new(
        config: &SystemConfig,
        clips: impl IntoIterator<Item = Clip>,
        factory: &mut dyn DeviceFactory,
    ) -> Result<Self, ConfigurationError> {
        validate(config)?;

        let channels: Vec<Channel> = config
            .channels
            .iter()
            .map(|desc| {
                let channel = Channel::new(desc, config.fade_step, factory);
                info!(
                    "channel '{}' ({}): {} voice(s) on '{}', reference {:.1} dB",
                    desc.label,
                    desc.identity,
                    desc.voices,
                    desc.mixer,
                    channel.gain().reference_db()
                );
                channel
            })
            .collect();

        let mut bank = SlotMap::with_key();
        for clip in clips {
            bank.insert(clip);
        }
        info!("sound system ready: {} channel(s), {} clip(s)", channels.len(), bank.len());

        Ok(Self {
            registry: ChannelRegistry::new(channels),
            clips: bank,
            fade_step: config.fade_step,
        })
    }

    pub fn fade_step(&self) -> f32 {
        self.fade_step
    }

    // --- Clip bank ---

    pub fn add_clip(&mut self, clip: Clip) -> ClipKey {
        self.clips.insert(clip)
    }

    pub fn clip(&self, key: ClipKey) -> Option<&Clip> {
        self.clips.get(key)
    }

    pub fn clips(&self) -> impl Iterator<Item = (ClipKey, &Clip)> {
        self.clips.iter()
    }

    /// Key of the first clip called `name`.
    pub fn find_clip(&self, name: &str) -> Option<ClipKey> {
        self.clips
            .iter()
            .find(|(_, clip)| clip.name.as_str() == name)
            .map(|(key, _)| key)
    }

    // --- Introspection ---

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.registry.iter()
    }

    /// First channel matching `mask`.
    pub fn channel(&self, mask: ChannelMask) -> Option<&Channel> {
        self.registry.find(mask)
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> Vec<ChannelSnapshot> {
        self.registry.iter().map(Channel::snapshot).collect()
    }

    // --- Playback commands ---

    /// Start `key` on an idle voice of each matching channel.
    /// Returns how many channels started it.
    pub fn play(&mut self, mask: ChannelMask, key: ClipKey, pitch: f32, looping: bool) -> usize {
        let Some(clip) = self.clips.get(key) else {
            warn!("play: unknown clip {:?}", key);
            return 0;
        };
        let mut started = 0;
        let matched = self.registry.for_each_matching(mask, |ch| match ch.play(key, clip, pitch, looping) {
            Some(_) => started += 1,
            None => debug!("{}: no idle voice for '{}'", ch.label(), clip.name),
        });
        log_unmatched("play", mask, matched);
        started
    }

    /// Start `key` on each matching channel, stealing the voice closest to
    /// finishing when none is idle.
    pub fn play_override(&mut self, mask: ChannelMask, key: ClipKey, pitch: f32) -> usize {
        let Some(clip) = self.clips.get(key) else {
            warn!("play_override: unknown clip {:?}", key);
            return 0;
        };
        let mut started = 0;
        let matched = self.registry.for_each_matching(mask, |ch| {
            if ch.play_override(key, clip, pitch, false).is_some() {
                started += 1;
            }
        });
        log_unmatched("play_override", mask, matched);
        started
    }

    /// Start `key` on each matching channel, overlaying it on the voice
    /// closest in pitch when none is idle.
    pub fn play_combined(&mut self, mask: ChannelMask, key: ClipKey, pitch: f32) -> usize {
        let Some(clip) = self.clips.get(key) else {
            warn!("play_combined: unknown clip {:?}", key);
            return 0;
        };
        let mut started = 0;
        let matched = self.registry.for_each_matching(mask, |ch| {
            if ch.play_combined(key, clip, pitch).is_some() {
                started += 1;
            }
        });
        log_unmatched("play_combined", mask, matched);
        started
    }

    /// Start `key` on each matching channel and fade out everything else
    /// those channels are playing over `seconds`.
    pub fn transition(&mut self, mask: ChannelMask, key: ClipKey, pitch: f32, seconds: f32, looping: bool) -> usize {
        let Some(clip) = self.clips.get(key) else {
            warn!("transition: unknown clip {:?}", key);
            return 0;
        };
        let mut started = 0;
        let matched = self.registry.for_each_matching(mask, |ch| {
            if let Some(voice) = ch.transition(key, clip, pitch, seconds, looping) {
                debug!("{}: transition to '{}' on voice {} over {}s", ch.label(), clip.name, voice, seconds);
                started += 1;
            }
        });
        log_unmatched("transition", mask, matched);
        started
    }

    // --- Mixing commands ---

    pub fn mute(&mut self, mask: ChannelMask) {
        let matched = self.registry.for_each_matching(mask, Channel::mute);
        log_unmatched("mute", mask, matched);
    }

    pub fn unmute(&mut self, mask: ChannelMask) {
        let matched = self.registry.for_each_matching(mask, Channel::unmute);
        log_unmatched("unmute", mask, matched);
    }

    pub fn pause(&mut self, mask: ChannelMask) {
        let matched = self.registry.for_each_matching(mask, Channel::pause);
        log_unmatched("pause", mask, matched);
    }

    pub fn resume(&mut self, mask: ChannelMask) {
        let matched = self.registry.for_each_matching(mask, Channel::resume);
        log_unmatched("resume", mask, matched);
    }

    /// Set the volume of every voice on matching channels. The all-channels
    /// mask moves the master sliders instead.
    pub fn set_volume(&mut self, mask: ChannelMask, level: f32) {
        if mask.is_all() {
            self.set_master_volume(level);
            return;
        }
        let matched = self.registry.for_each_matching(mask, |ch| ch.set_volume(level));
        log_unmatched("set_volume", mask, matched);
    }

    /// Move every channel's master slider.
    pub fn set_master_volume(&mut self, level: f32) {
        debug!("master volume -> {}", level);
        for channel in self.registry.iter_mut() {
            channel.set_slider(level);
        }
    }

    pub fn mute_all(&mut self) {
        self.mute(ChannelMask::all());
    }

    pub fn unmute_all(&mut self) {
        self.unmute(ChannelMask::all());
    }

    pub fn pause_all(&mut self) {
        self.pause(ChannelMask::all());
    }

    pub fn resume_all(&mut self) {
        self.resume(ChannelMask::all());
    }

    /// Grow the first channel matching `mask` with a host-created device.
    pub fn add_external_source(&mut self, mask: ChannelMask, device: Box<dyn PlaybackDevice>) -> Option<VoiceId> {
        match self.registry.find_mut(mask) {
            Some(channel) => {
                let id = channel.add_source(device);
                info!("{}: external source added as voice {}", channel.label(), id);
                Some(id)
            }
            None => {
                warn!("add_external_source: no channel matches {}", mask);
                None
            }
        }
    }

    // --- Realtime ---

    /// Advance device clocks and fades by `dt` seconds, then recompute
    /// every channel's master level. Does not allocate.
    pub fn tick(&mut self, dt: f32) {
        for channel in self.registry.iter_mut() {
            channel.tick(dt);
        }
    }

    /// Drop every pending fade and stop every voice on every channel.
    pub fn stop_all(&mut self) {
        for channel in self.registry.iter_mut() {
            channel.stop_all();
        }
    }

    /// Stop every voice and drop the system.
    pub fn shutdown(mut self) {
        self.stop_all();
        info!("sound system shut down ({} channel(s))", self.registry.len());
    }
}

fn log_unmatched(command: &str, mask: ChannelMask, matched: usize) {
    if matched == 0 {
        debug!("{}: no channel matches {}", command, mask);
    }
}

fn validate(config: &SystemConfig) -> Result<(), ConfigurationError> {
    if config.channels.is_empty() {
        return Err(ConfigurationError::NoChannels);
    }
    if !config.fade_step.is_finite() || config.fade_step <= 0.0 {
        return Err(ConfigurationError::InvalidFadeStep(config.fade_step));
    }
    let mut seen = ChannelMask::empty();
    for (index, desc) in config.channels.iter().enumerate() {
        if desc.label.trim().is_empty() {
            return Err(ConfigurationError::EmptyLabel { index });
        }
        if !desc.identity.is_single() {
            return Err(ConfigurationError::InvalidIdentity {
                label: desc.label.clone(),
                identity: desc.identity,
            });
        }
        if seen.intersects(desc.identity) {
            return Err(ConfigurationError::DuplicateIdentity {
                label: desc.label.clone(),
                identity: desc.identity,
            });
        }
        seen |= desc.identity;
    }
    Ok(())
}
