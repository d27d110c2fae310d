//! RON channel/clip manifest.
//!
//! ```ron
//! (
//!     fade_step: 0.1,
//!     channels: [
//!         (identity: "MUSIC", label: "Music", voices: 2, mixer: "Mixers/Music"),
//!     ],
//!     clips: [
//!         (name: "theme", length: 92.5),
//!     ],
//! )
//! ```

use std::path::Path;

use cm_ir::{ChannelDescriptor, Clip, SystemConfig, CLIP_NAME_LEN, DEFAULT_FADE_STEP};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// A clip as written in a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipEntry {
    pub name: String,
    /// Length in seconds at pitch 1.0.
    pub length: f32,
}

impl ClipEntry {
    fn to_clip(&self) -> Result<Clip, FormatError> {
        if self.name.len() > CLIP_NAME_LEN {
            return Err(FormatError::ClipNameTooLong { name: self.name.clone(), max: CLIP_NAME_LEN });
        }
        if self.length.is_nan() || self.length < 0.0 {
            return Err(FormatError::InvalidClipLength { name: self.name.clone(), length: self.length });
        }
        Ok(Clip::new(&self.name, self.length))
    }
}

impl From<&Clip> for ClipEntry {
    fn from(clip: &Clip) -> Self {
        Self { name: clip.name.to_string(), length: clip.length }
    }
}

/// On-disk layout.
#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default = "default_fade_step")]
    fade_step: f32,
    channels: Vec<ChannelDescriptor>,
    #[serde(default)]
    clips: Vec<ClipEntry>,
}

fn default_fade_step() -> f32 {
    DEFAULT_FADE_STEP
}

/// A loaded manifest: system configuration plus the clips to bank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Manifest {
    pub config: SystemConfig,
    pub clips: Vec<Clip>,
}

/// Parse a manifest from RON text.
///
/// Channel-level rules (single identity bits, unique identities, labels)
/// are checked when the sound system is built; only clip entries are
/// validated here.
pub fn load_config(text: &str) -> Result<Manifest, FormatError> {
    let doc: Document = ron::from_str(text)?;
    let clips = doc
        .clips
        .iter()
        .map(ClipEntry::to_clip)
        .collect::<Result<Vec<_>, _>>()?;
    debug!("manifest: {} channel(s), {} clip(s)", doc.channels.len(), clips.len());
    Ok(Manifest {
        config: SystemConfig { fade_step: doc.fade_step, channels: doc.channels },
        clips,
    })
}

/// Read and parse a manifest file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<Manifest, FormatError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let manifest = load_config(&text)?;
    info!("loaded manifest {}", path.display());
    Ok(manifest)
}

/// Render a manifest as pretty RON that `load_config` reads back.
pub fn to_ron(manifest: &Manifest) -> Result<String, FormatError> {
    let doc = Document {
        fade_step: manifest.config.fade_step,
        channels: manifest.config.channels.clone(),
        clips: manifest.clips.iter().map(ClipEntry::from).collect(),
    };
    Ok(ron::ser::to_string_pretty(&doc, ron::ser::PrettyConfig::new())?)
}
