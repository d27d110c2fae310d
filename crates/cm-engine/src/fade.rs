//! Tick-driven volume ramps that silence and stop voices.
//!
//! A transition hands every outgoing voice to the scheduler. Each task
//! lowers its voice's volume by `starting / duration` per second of fade,
//! applied in fixed steps. Once the volume reaches `FADE_FLOOR` the voice is
//! stopped and its starting volume restored so it can be reused at full level.

use cm_ir::FADE_FLOOR;

use crate::voice::{Voice, VoiceId};
use crate::voice_pool::VoicePool;

/// Lifecycle of a fade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FadeState {
    #[default]
    Running,
    Complete,
}

/// An in-flight ramp on one voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeTask {
    voice: VoiceId,
    starting_volume: f32,
    duration: f32,
    /// Time accumulated towards the next step.
    pending: f32,
    /// Total fade time applied so far.
    elapsed: f32,
    state: FadeState,
}

impl FadeTask {
    /// A running fade of `voice` from `starting_volume` over `duration` seconds.
    pub fn new(voice: VoiceId, starting_volume: f32, duration: f32) -> Self {
        Self {
            voice,
            starting_volume,
            duration,
            pending: 0.0,
            elapsed: 0.0,
            state: FadeState::Running,
        }
    }

    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    /// Volume the voice is restored to when the fade completes.
    pub fn starting_volume(&self) -> f32 {
        self.starting_volume
    }

    /// Fade length in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Fade time applied so far, in whole steps.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    /// Apply one step of `step` seconds to `voice`.
    fn apply_step(&mut self, voice: &mut Voice, step: f32) {
        // Zero or NaN durations finish immediately.
        let decrement = if self.duration > 0.0 {
            self.starting_volume / self.duration * step
        } else {
            f32::INFINITY
        };
        self.elapsed += step;
        let volume = voice.volume() - decrement;
        if volume > FADE_FLOOR {
            voice.set_volume(volume);
        } else {
            voice.stop();
            voice.set_volume(self.starting_volume);
            self.state = FadeState::Complete;
        }
    }

    /// Accumulate `dt` and apply every step that is due.
    fn advance(&mut self, dt: f32, step: f32, pool: &mut VoicePool) {
        self.pending += dt;
        while self.state == FadeState::Running && self.pending >= step {
            self.pending -= step;
            match pool.get_mut(self.voice) {
                Some(voice) => self.apply_step(voice, step),
                None => self.state = FadeState::Complete,
            }
        }
    }
}

/// Owns the fades of one channel, at most one per voice.
#[derive(Clone, Debug)]
pub struct FadeScheduler {
    step: f32,
    tasks: Vec<FadeTask>,
}

impl FadeScheduler {
    /// Create a scheduler stepping every `step` seconds, with room for
    /// `capacity` concurrent fades before it allocates.
    pub fn new(step: f32, capacity: usize) -> Self {
        Self { step, tasks: Vec::with_capacity(capacity) }
    }

    /// Seconds between fade steps.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Begin fading `voice` from `starting_volume` over `seconds`.
    ///
    /// Replaces any fade already running on that voice. The replaced fade's
    /// starting volume is kept, so the voice is still restored to its level
    /// from before the first fade.
    pub fn start(&mut self, voice: VoiceId, starting_volume: f32, seconds: f32) {
        let starting = self.get(voice).map_or(starting_volume, FadeTask::starting_volume);
        self.cancel(voice);
        self.tasks.push(FadeTask::new(voice, starting, seconds));
    }

    /// Drop the fade on `voice` without restoring its volume.
    /// Returns true if a fade was running.
    pub fn cancel(&mut self, voice: VoiceId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.voice != voice);
        self.tasks.len() != before
    }

    /// Drop every fade.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// True if a fade is running on `voice`.
    pub fn is_fading(&self, voice: VoiceId) -> bool {
        self.tasks.iter().any(|t| t.voice == voice)
    }

    /// The fade running on `voice`, if any.
    pub fn get(&self, voice: VoiceId) -> Option<&FadeTask> {
        self.tasks.iter().find(|t| t.voice == voice)
    }

    /// Number of fades in flight.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance every fade by `dt`. Returns how many completed.
    pub fn advance(&mut self, dt: f32, pool: &mut VoicePool) -> usize {
        let step = self.step;
        for task in &mut self.tasks {
            task.advance(dt, step, pool);
        }
        let before = self.tasks.len();
        self.tasks.retain(|t| t.state == FadeState::Running);
        before - self.tasks.len()
    }
}
