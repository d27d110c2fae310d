//! Channel selection bit-set.

use bitflags::bitflags;

bitflags! {
    /// One or more logical channels, used to route commands.
    ///
    /// Every configured channel owns exactly one of these bits. A command
    /// tagged with a mask reaches each channel whose bit is set in it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ChannelMask: u8 {
        const EXPLOSIONS = 1;
        const INSTANTIATIONS = 1 << 1;
        const MOVEMENT = 1 << 2;
        const MUSIC = 1 << 3;
        const INTERACTIONS = 1 << 4;
        const DIALOG = 1 << 5;
    }
}

impl ChannelMask {
    /// Build a mask from raw bits, dropping bits with no defined channel.
    pub const fn from_raw(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// True if the two masks share at least one channel.
    pub const fn matches(self, other: Self) -> bool {
        self.intersects(other)
    }

    /// True if every mask in `others` shares a channel with `self`.
    ///
    /// An empty slice is vacuously matched.
    pub fn matches_all(self, others: &[Self]) -> bool {
        others.iter().all(|o| self.matches(*o))
    }

    /// True if exactly one channel bit is set.
    pub const fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}

impl core::fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl core::str::FromStr for ChannelMask {
    type Err = bitflags::parser::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bitflags::parser::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn from_raw_truncates_undefined_bits() {
        let mask = ChannelMask::from_raw(0b1100_0001);
        assert_eq!(mask, ChannelMask::EXPLOSIONS);
    }

    #[test]
    fn matches_is_intersection() {
        let union = ChannelMask::MUSIC | ChannelMask::DIALOG;
        assert!(union.matches(ChannelMask::MUSIC));
        assert!(ChannelMask::DIALOG.matches(union));
        assert!(!union.matches(ChannelMask::MOVEMENT));
        assert!(!ChannelMask::empty().matches(ChannelMask::all()));
    }

    #[test]
    fn matches_all_needs_every_flag() {
        let all = ChannelMask::all();
        let every = [
            ChannelMask::EXPLOSIONS,
            ChannelMask::INSTANTIATIONS,
            ChannelMask::MOVEMENT,
            ChannelMask::MUSIC,
            ChannelMask::INTERACTIONS,
            ChannelMask::DIALOG,
        ];
        assert!(all.matches_all(&every));
        let partial = ChannelMask::MUSIC | ChannelMask::DIALOG;
        assert!(!partial.matches_all(&every));
        assert!(partial.matches_all(&[]));
    }

    #[test]
    fn is_single_counts_bits() {
        assert!(ChannelMask::MUSIC.is_single());
        assert!(!(ChannelMask::MUSIC | ChannelMask::DIALOG).is_single());
        assert!(!ChannelMask::empty().is_single());
    }

    #[test]
    fn text_format_parses_unions() {
        let mask: ChannelMask = "MUSIC | DIALOG".parse().unwrap();
        assert_eq!(mask, ChannelMask::MUSIC | ChannelMask::DIALOG);
        assert_eq!(mask.to_string(), "MUSIC | DIALOG");
    }

    #[test]
    fn text_format_rejects_unknown_names() {
        assert!("MUSIC | BANJO".parse::<ChannelMask>().is_err());
    }
}
