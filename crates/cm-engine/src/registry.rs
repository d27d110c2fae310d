//! Lookup and fan-out of channels by mask.

use cm_ir::ChannelMask;

use crate::channel::Channel;

/// All channels of a system, in configuration order.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// First channel whose identity intersects `mask`.
    pub fn find(&self, mask: ChannelMask) -> Option<&Channel> {
        self.channels.iter().find(|c| c.matches(mask))
    }

    pub fn find_mut(&mut self, mask: ChannelMask) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.matches(mask))
    }

    pub fn find_all(&self, mask: ChannelMask) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(move |c| c.matches(mask))
    }

    pub fn find_all_mut(&mut self, mask: ChannelMask) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut().filter(move |c| c.matches(mask))
    }

    /// Apply `op` to every channel matching `mask`. Returns how many matched.
    pub fn for_each_matching<F>(&mut self, mask: ChannelMask, mut op: F) -> usize
    where
        F: FnMut(&mut Channel),
    {
        let mut matched = 0;
        for channel in self.find_all_mut(mask) {
            op(channel);
            matched += 1;
        }
        matched
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    /// Union of every channel identity.
    pub fn identities(&self) -> ChannelMask {
        self.channels
            .iter()
            .fold(ChannelMask::empty(), |acc, c| acc | c.identity())
    }
}
