//! Voice management engine for channelmix.
//!
//! Channels own fixed pools of voices, allocate them to clips under one of
//! three policies, fade outgoing voices on transitions and keep each
//! channel's master level in step with how many voices are sounding.

mod channel;
mod device;
mod error;
mod fade;
mod gain;
mod registry;
mod system;
mod virtual_source;
mod voice;
mod voice_pool;

pub use channel::{Channel, ChannelSnapshot};
pub use device::{DeviceFactory, MasterBus, PlaybackDevice};
pub use error::ConfigurationError;
pub use fade::{FadeScheduler, FadeState, FadeTask};
pub use gain::{master_gain_db, GainController};
pub use registry::ChannelRegistry;
pub use system::SoundSystem;
pub use virtual_source::{VirtualBus, VirtualDevices, VirtualSource, MAX_ONE_SHOTS};
pub use voice::{Voice, VoiceId};
pub use voice_pool::{Allocation, VoicePool};
