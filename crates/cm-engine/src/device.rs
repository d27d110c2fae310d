//! Traits for the playback hardware the engine drives.

use cm_ir::{ChannelDescriptor, Clip, ClipKey};

/// One native playback source bound to a voice.
///
/// The engine never touches sample data; it only tells the source which clip
/// to play and how, and asks whether it is still playing.
pub trait PlaybackDevice: Send {
    /// Bind a clip without starting it.
    fn assign(&mut self, key: ClipKey, clip: &Clip);
    fn set_pitch(&mut self, pitch: f32);
    fn set_loop(&mut self, looping: bool);
    /// Start the assigned clip from the beginning.
    fn play(&mut self);
    /// Mix a clip on top of whatever is playing, without replacing it.
    fn play_one_shot(&mut self, key: ClipKey, clip: &Clip);
    /// Stop the assigned clip and any one-shots.
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_mute(&mut self, muted: bool);
    /// True while audible output is being produced (false when paused).
    fn is_playing(&self) -> bool;
    /// Seconds of clip time left on the assigned clip (`length - elapsed`).
    fn remaining_time(&self) -> f32;
    /// Advance a simulated clock. Hardware-backed sources ignore this.
    fn advance(&mut self, _dt: f32) {}
}

/// The mixer bus carrying a channel's master level.
pub trait MasterBus: Send {
    /// Level currently set on the bus, if the bus can report one.
    fn master_db(&self) -> Option<f32>;
    fn set_master_db(&mut self, db: f32);
}

/// Builds the devices for a channel at initialization.
pub trait DeviceFactory {
    /// Create the source for voice `index` of `channel`.
    fn create_source(&mut self, channel: &ChannelDescriptor, index: usize) -> Box<dyn PlaybackDevice>;
    /// Create the master bus for `channel`.
    fn create_bus(&mut self, channel: &ChannelDescriptor) -> Box<dyn MasterBus>;
}
