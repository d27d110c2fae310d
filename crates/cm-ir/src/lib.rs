//! Core value types for channelmix.
//!
//! Channel masks, clip metadata and channel descriptors shared by the
//! engine, the configuration loader and the host controller.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel_mask;
mod clip;
mod descriptor;

pub use channel_mask::ChannelMask;
pub use clip::{Clip, ClipKey, CLIP_NAME_LEN};
pub use descriptor::{
    ChannelDescriptor, SystemConfig, DEFAULT_FADE_STEP, FADE_FLOOR, HEADROOM_PER_VOICE,
    SILENCE_DB,
};
