//! Errors raised while building a sound system.

use cm_ir::ChannelMask;
use thiserror::Error;

/// A channel configuration the system cannot start with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no channels configured")]
    NoChannels,

    #[error("channel #{index} has an empty label")]
    EmptyLabel { index: usize },

    #[error("channel '{label}' identity '{identity}' must be exactly one channel bit")]
    InvalidIdentity { label: String, identity: ChannelMask },

    #[error("channel '{label}' reuses identity '{identity}'")]
    DuplicateIdentity { label: String, identity: ChannelMask },

    #[error("fade step must be a positive number of seconds, got {0}")]
    InvalidFadeStep(f32),
}
