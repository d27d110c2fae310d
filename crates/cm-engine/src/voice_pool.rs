//! VoicePool: fixed set of voices for one channel and its allocation policies.

use cm_ir::{Clip, ClipKey};

use crate::device::PlaybackDevice;
use crate::voice::{Voice, VoiceId};

/// How a request obtained its voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allocation {
    /// An idle voice was started.
    Idle(VoiceId),
    /// The clip was mixed on top of a busy voice.
    Overlay(VoiceId),
    /// A busy voice was stopped and restarted with the new clip.
    Stolen(VoiceId),
}

impl Allocation {
    /// The voice the request landed on.
    pub fn voice(self) -> VoiceId {
        match self {
            Allocation::Idle(id) | Allocation::Overlay(id) | Allocation::Stolen(id) => id,
        }
    }
}

/// Voices owned by one channel, scanned in stable index order.
pub struct VoicePool {
    voices: Vec<Voice>,
}

impl VoicePool {
    /// Build a pool with one voice per device.
    pub fn new(devices: impl IntoIterator<Item = Box<dyn PlaybackDevice>>) -> Self {
        Self {
            voices: devices.into_iter().map(Voice::new).collect(),
        }
    }

    /// Add a voice for a device the host created itself. Returns its ID.
    ///
    /// This is the only way a pool grows.
    pub fn push_external(&mut self, device: Box<dyn PlaybackDevice>) -> VoiceId {
        self.voices.push(Voice::new(device));
        self.voices.len() - 1
    }

    /// Number of voices in the pool.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Get a reference to a voice.
    pub fn get(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.get(id)
    }

    /// Get a mutable reference to a voice.
    pub fn get_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.get_mut(id)
    }

    /// Iterate voices in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    /// Index of the first idle voice.
    pub fn first_idle(&self) -> Option<VoiceId> {
        self.voices.iter().position(Voice::is_idle)
    }

    /// Start `clip` on the first idle voice. Returns None, touching nothing,
    /// when every voice is busy.
    pub fn allocate(&mut self, key: ClipKey, clip: &Clip, pitch: f32, looping: bool) -> Option<VoiceId> {
        let id = self.first_idle()?;
        self.voices[id].start(key, clip, pitch, looping);
        Some(id)
    }

    /// Start `clip` on an idle voice, or overlay it on the busy voice whose
    /// pitch is closest to `pitch` (lowest index on ties).
    pub fn allocate_closest_pitch(&mut self, key: ClipKey, clip: &Clip, pitch: f32) -> Option<Allocation> {
        if let Some(id) = self.allocate(key, clip, pitch, false) {
            return Some(Allocation::Idle(id));
        }
        let id = self.closest_pitch(pitch)?;
        self.voices[id].overlay(key, clip);
        Some(Allocation::Overlay(id))
    }

    /// Start `clip` on an idle voice, or stop the busy voice with the least
    /// remaining time (lowest index on ties) and start it there.
    pub fn allocate_override(&mut self, key: ClipKey, clip: &Clip, pitch: f32, looping: bool) -> Option<Allocation> {
        if let Some(id) = self.allocate(key, clip, pitch, looping) {
            return Some(Allocation::Idle(id));
        }
        let id = self.soonest_to_finish()?;
        let voice = &mut self.voices[id];
        voice.stop();
        voice.start(key, clip, pitch, looping);
        Some(Allocation::Stolen(id))
    }

    /// Every voice except `keep`, in pool order.
    pub fn others(&self, keep: VoiceId) -> Vec<VoiceId> {
        (0..self.voices.len()).filter(|&id| id != keep).collect()
    }

    /// Voice whose pitch is nearest `pitch`; first wins on ties.
    fn closest_pitch(&self, pitch: f32) -> Option<VoiceId> {
        let mut best: Option<(VoiceId, f32)> = None;
        for (id, voice) in self.voices.iter().enumerate() {
            let distance = (voice.pitch() - pitch).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Voice with the least remaining time; first wins on ties.
    fn soonest_to_finish(&self) -> Option<VoiceId> {
        let mut best: Option<(VoiceId, f32)> = None;
        for (id, voice) in self.voices.iter().enumerate() {
            let remaining = voice.remaining_time();
            if best.map_or(true, |(_, r)| remaining < r) {
                best = Some((id, remaining));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Set every voice's volume.
    pub fn set_volume_all(&mut self, level: f32) {
        for voice in &mut self.voices {
            voice.set_volume(level);
        }
    }

    /// Mute every voice. Idempotent.
    pub fn mute_all(&mut self) {
        for voice in &mut self.voices {
            voice.set_mute(true);
        }
    }

    /// Unmute every voice. Idempotent.
    pub fn unmute_all(&mut self) {
        for voice in &mut self.voices {
            voice.set_mute(false);
        }
    }

    /// Pause every playing voice.
    pub fn pause_all(&mut self) {
        for voice in &mut self.voices {
            voice.pause();
        }
    }

    /// Resume every paused voice.
    pub fn resume_all(&mut self) {
        for voice in &mut self.voices {
            voice.resume();
        }
    }

    /// Stop every voice.
    pub fn stop_all(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    /// Advance every device clock.
    pub fn advance(&mut self, dt: f32) {
        for voice in &mut self.voices {
            voice.advance(dt);
        }
    }

    /// Number of voices currently producing output.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }
}

impl core::fmt::Debug for VoicePool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.voices.iter()).finish()
    }
}
