//! Master gain curve with concurrency headroom.

use cm_ir::{HEADROOM_PER_VOICE, SILENCE_DB};

/// Master level in dB for a slider position and a count of playing voices.
///
/// With more than one voice playing, `active * HEADROOM_PER_VOICE` is taken
/// off the slider before the log. Results are floored at `SILENCE_DB`; a
/// non-positive argument maps straight to the floor.
pub fn master_gain_db(reference_db: f32, slider: f32, active: usize) -> f32 {
    let level = if active > 1 {
        slider - active as f32 * HEADROOM_PER_VOICE
    } else {
        slider
    };
    if !level.is_finite() || level <= 0.0 {
        return SILENCE_DB;
    }
    let db = reference_db + 20.0 * level.log10();
    if db.is_nan() {
        SILENCE_DB
    } else {
        db.max(SILENCE_DB)
    }
}

/// Per-channel gain state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainController {
    /// Neutral bus level captured at initialization.
    reference_db: f32,
    /// Linear slider position in [0, 1].
    slider: f32,
    /// Level most recently computed.
    gain_db: f32,
}

impl GainController {
    pub fn new(reference_db: f32) -> Self {
        Self { reference_db, slider: 1.0, gain_db: reference_db }
    }

    /// Move the slider and recompute without headroom. Returns the new level.
    pub fn set_slider(&mut self, level: f32) -> f32 {
        self.slider = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.gain_db = master_gain_db(self.reference_db, self.slider, 0);
        self.gain_db
    }

    /// Recompute for the current number of playing voices. Returns the new level.
    pub fn recompute(&mut self, active: usize) -> f32 {
        self.gain_db = master_gain_db(self.reference_db, self.slider, active);
        self.gain_db
    }

    pub fn reference_db(&self) -> f32 {
        self.reference_db
    }

    pub fn slider(&self) -> f32 {
        self.slider
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }
}
