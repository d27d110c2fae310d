//! Channel descriptors and system configuration.

use alloc::string::String;
use alloc::vec::Vec;

use crate::channel_mask::ChannelMask;

/// Gain floor in dB; anything at or below is treated as silence.
pub const SILENCE_DB: f32 = -80.0;

/// Slider headroom removed per concurrently active voice.
pub const HEADROOM_PER_VOICE: f32 = 0.03;

/// Default fade step in seconds.
pub const DEFAULT_FADE_STEP: f32 = 0.1;

/// Volume at or below which a fading voice is stopped.
pub const FADE_FLOOR: f32 = 0.01;

/// Description of one logical channel, supplied by the host's loader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelDescriptor {
    /// The channel's single identity bit.
    pub identity: ChannelMask,
    /// Label prefix used to name the channel's voices.
    pub label: String,
    /// Number of preallocated voices.
    pub voices: usize,
    /// Key of the mixer resource the channel's master bus belongs to.
    pub mixer: String,
    /// Neutral master level in dB, used when the bus does not report one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference_db: f32,
}

impl ChannelDescriptor {
    pub fn new(identity: ChannelMask, label: &str, voices: usize, mixer: &str) -> Self {
        Self {
            identity,
            label: label.into(),
            voices,
            mixer: mixer.into(),
            reference_db: 0.0,
        }
    }
}

/// Everything the sound system needs at construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemConfig {
    /// Interval between fade steps, in seconds.
    #[cfg_attr(feature = "serde", serde(default = "default_fade_step"))]
    pub fade_step: f32,
    /// Channels in routing order.
    pub channels: Vec<ChannelDescriptor>,
}

#[cfg(feature = "serde")]
fn default_fade_step() -> f32 {
    DEFAULT_FADE_STEP
}

impl SystemConfig {
    pub fn new(channels: Vec<ChannelDescriptor>) -> Self {
        Self { fade_step: DEFAULT_FADE_STEP, channels }
    }

    /// Union of every configured channel identity.
    pub fn identities(&self) -> ChannelMask {
        self.channels
            .iter()
            .fold(ChannelMask::empty(), |acc, c| acc | c.identity)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
