//! The six-channel reference layout.

use cm_ir::{ChannelDescriptor, ChannelMask, Clip, SystemConfig};

use crate::Manifest;

/// Voices per channel in the reference layout.
pub const REFERENCE_VOICES: usize = 4;

const CHANNELS: [(ChannelMask, &str, &str); 6] = [
    (ChannelMask::EXPLOSIONS, "Explosion", "Mixers/Explosions"),
    (ChannelMask::INSTANTIATIONS, "Instantiation", "Mixers/Instantiations"),
    (ChannelMask::MOVEMENT, "Movement", "Mixers/Movement"),
    (ChannelMask::MUSIC, "Music", "Mixers/Music"),
    (ChannelMask::INTERACTIONS, "Interaction", "Mixers/Interactions"),
    (ChannelMask::DIALOG, "Dialog", "Mixers/Dialog"),
];

/// One channel per defined mask bit, `REFERENCE_VOICES` voices each.
pub fn reference_config() -> SystemConfig {
    SystemConfig::new(
        CHANNELS
            .iter()
            .map(|&(identity, label, mixer)| ChannelDescriptor::new(identity, label, REFERENCE_VOICES, mixer))
            .collect(),
    )
}

/// The reference layout with a small demo clip set.
pub fn reference_manifest() -> Manifest {
    Manifest {
        config: reference_config(),
        clips: vec![
            Clip::new("explosion", 1.8),
            Clip::new("spawn", 0.6),
            Clip::new("footstep", 0.25),
            Clip::new("theme", 92.5),
            Clip::new("battle", 64.0),
            Clip::new("click", 0.1),
            Clip::new("greeting", 3.2),
        ],
    }
}
