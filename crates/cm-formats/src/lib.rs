//! Manifest loading for channelmix.
//!
//! Parses RON manifests describing channels and clips into the IR, and
//! ships the six-channel reference layout.

mod manifest;
mod reference;

pub use manifest::{load_config, load_config_file, to_ron, ClipEntry, Manifest};
pub use reference::{reference_config, reference_manifest, REFERENCE_VOICES};

use thiserror::Error;

/// Error type for manifest parsing.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Malformed RON, or a document of the wrong shape
    #[error("manifest syntax: {0}")]
    Syntax(#[from] ron::error::SpannedError),
    /// Serializer failure
    #[error("manifest encoding: {0}")]
    Encode(#[from] ron::Error),
    /// Clip length negative or not a number
    #[error("clip '{name}' has invalid length {length}")]
    InvalidClipLength { name: String, length: f32 },
    /// Clip name does not fit the inline name buffer
    #[error("clip name '{name}' is longer than {max} bytes")]
    ClipNameTooLong { name: String, max: usize },
    /// I/O error
    #[error("reading manifest: {0}")]
    Io(#[from] std::io::Error),
}
