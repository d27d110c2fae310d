//! Voice: one playback slot bound to a device.

use cm_ir::{Clip, ClipKey};

use crate::device::PlaybackDevice;

/// Identifier for a voice slot in a pool.
pub type VoiceId = usize;

/// A single playback slot.
///
/// Mirrors the parameters it has pushed to its device so the pool can rank
/// voices without querying the device for everything.
pub struct Voice {
    device: Box<dyn PlaybackDevice>,
    /// Clip most recently started on this voice.
    clip: Option<ClipKey>,
    pitch: f32,
    looping: bool,
    volume: f32,
    muted: bool,
    paused: bool,
}

impl Voice {
    /// Wrap a device. The voice starts idle at pitch 1.0 and full volume.
    pub fn new(device: Box<dyn PlaybackDevice>) -> Self {
        Self {
            device,
            clip: None,
            pitch: 1.0,
            looping: false,
            volume: 1.0,
            muted: false,
            paused: false,
        }
    }

    /// Start `clip` from the beginning with the given pitch and loop flag.
    pub fn start(&mut self, key: ClipKey, clip: &Clip, pitch: f32, looping: bool) {
        self.clip = Some(key);
        self.pitch = pitch;
        self.looping = looping;
        self.paused = false;
        self.device.assign(key, clip);
        self.device.set_pitch(pitch);
        self.device.set_loop(looping);
        self.device.play();
    }

    /// Mix `clip` on top of the current output without stopping it.
    pub fn overlay(&mut self, key: ClipKey, clip: &Clip) {
        self.paused = false;
        self.device.play_one_shot(key, clip);
    }

    /// Stop the clip and any overlays. The voice becomes idle.
    pub fn stop(&mut self) {
        self.paused = false;
        self.device.stop();
    }

    /// Pause output. A paused voice reports idle.
    pub fn pause(&mut self) {
        if self.device.is_playing() {
            self.paused = true;
        }
        self.device.pause();
    }

    /// Resume after `pause`.
    pub fn resume(&mut self) {
        self.paused = false;
        self.device.resume();
    }

    /// Set the linear volume pushed to the device.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.device.set_volume(volume);
    }

    /// Mute or unmute without changing the volume.
    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
        self.device.set_mute(muted);
    }

    /// Change the loop flag of the current clip.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        self.device.set_loop(looping);
    }

    /// Advance the device clock.
    pub fn advance(&mut self, dt: f32) {
        self.device.advance(dt);
    }

    /// True if the device is producing output.
    pub fn is_playing(&self) -> bool {
        self.device.is_playing()
    }

    /// True if a clip is assigned and playing.
    pub fn is_active(&self) -> bool {
        self.clip.is_some() && self.device.is_playing()
    }

    /// True if the voice can take a new clip without interrupting anything.
    pub fn is_idle(&self) -> bool {
        !self.device.is_playing()
    }

    /// Seconds left on the current clip, as reported by the device.
    pub fn remaining_time(&self) -> f32 {
        self.device.remaining_time()
    }

    /// Clip most recently started, if any.
    pub fn clip(&self) -> Option<ClipKey> {
        self.clip
    }

    /// Pitch of the current clip.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl core::fmt::Debug for Voice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Voice")
            .field("clip", &self.clip)
            .field("pitch", &self.pitch)
            .field("looping", &self.looping)
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .field("paused", &self.paused)
            .field("playing", &self.is_playing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_source::VirtualSource;
    use slotmap::SlotMap;

    fn clip_bank(length: f32) -> (ClipKey, Clip) {
        let mut bank: SlotMap<ClipKey, Clip> = SlotMap::with_key();
        let clip = Clip::new("test", length);
        (bank.insert(clip.clone()), clip)
    }

    fn voice() -> Voice {
        Voice::new(Box::new(VirtualSource::new()))
    }

    #[test]
    fn new_voice_is_idle() {
        let v = voice();
        assert!(v.is_idle());
        assert!(!v.is_active());
        assert_eq!(v.clip(), None);
        assert_eq!(v.volume(), 1.0);
    }

    #[test]
    fn start_makes_voice_active() {
        let (key, clip) = clip_bank(2.0);
        let mut v = voice();
        v.start(key, &clip, 1.2, true);
        assert!(v.is_active());
        assert_eq!(v.clip(), Some(key));
        assert_eq!(v.pitch(), 1.2);
        assert!(v.is_looping());
        assert_eq!(v.remaining_time(), 2.0);
    }

    #[test]
    fn voice_goes_idle_when_clip_ends() {
        let (key, clip) = clip_bank(0.5);
        let mut v = voice();
        v.start(key, &clip, 1.0, false);
        v.advance(1.0);
        assert!(v.is_idle());
        assert!(!v.is_active());
        // The clip stays assigned for diagnostics.
        assert_eq!(v.clip(), Some(key));
    }

    #[test]
    fn overlay_keeps_current_clip() {
        let (key, clip) = clip_bank(2.0);
        let (other, other_clip) = clip_bank(0.3);
        let mut v = voice();
        v.start(key, &clip, 0.9, false);
        v.overlay(other, &other_clip);
        assert_eq!(v.clip(), Some(key));
        assert_eq!(v.pitch(), 0.9);
        assert!(v.is_active());
    }

    #[test]
    fn pause_only_flags_playing_voices() {
        let (key, clip) = clip_bank(2.0);
        let mut v = voice();
        v.pause();
        assert!(!v.is_paused());
        v.start(key, &clip, 1.0, false);
        v.pause();
        assert!(v.is_paused());
        assert!(v.is_idle());
        v.resume();
        assert!(!v.is_paused());
        assert!(v.is_active());
    }

    #[test]
    fn mute_is_mirrored() {
        let mut v = voice();
        v.set_mute(true);
        v.set_mute(true);
        assert!(v.is_muted());
        v.set_mute(false);
        assert!(!v.is_muted());
    }
}
