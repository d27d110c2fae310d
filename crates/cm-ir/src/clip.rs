//! Clip metadata.

use arrayvec::ArrayString;

/// Maximum clip name length in bytes.
pub const CLIP_NAME_LEN: usize = 32;

slotmap::new_key_type! {
    /// Key for referencing clips in the system's clip bank.
    pub struct ClipKey;
}

/// A playable clip as seen by the voice manager.
///
/// The sample data itself lives with the playback device; the manager only
/// needs a name for diagnostics and the length for remaining-time queries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clip {
    /// Clip name (truncated to `CLIP_NAME_LEN` bytes).
    pub name: ArrayString<CLIP_NAME_LEN>,
    /// Length in seconds at pitch 1.0.
    pub length: f32,
}

impl Clip {
    /// Create a clip, truncating the name on a char boundary if needed.
    pub fn new(name: &str, length: f32) -> Self {
        let mut clip = Self { name: ArrayString::new(), length: length.max(0.0) };
        for ch in name.chars() {
            if clip.name.try_push(ch).is_err() {
                break;
            }
        }
        clip
    }

    /// Playing time in seconds at the given pitch.
    pub fn duration_at(&self, pitch: f32) -> f32 {
        if pitch > 0.0 {
            self.length / pitch
        } else {
            f32::INFINITY
        }
    }
}
