//! Identifiers used throughout PariPool.
//!
//! Round ids are small monotonic integers starting at 1. Participant ids use
//! UUIDv7 for time-ordered lexicographic sorting. Option ids are bounded
//! indices whose out-of-range values are unrepresentable.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::OPTION_COUNT;
use crate::error::ParipoolError;

// ---------------------------------------------------------------------------
// RoundId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a voting round.
///
/// The first round ever started is `RoundId(1)`; zero is never issued, so a
/// stored round tag of 0 can only mean "no round".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl RoundId {
    /// The id assigned to the first round of an engine's lifetime.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// VoterId
// ---------------------------------------------------------------------------

/// Unique identifier for a voting participant. Uses UUIDv7 for
/// time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct VoterId(pub Uuid);

impl VoterId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for VoterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OptionId
// ---------------------------------------------------------------------------

/// Index of one of the four fixed voting options.
///
/// The inner value is private: an `OptionId` is obtained only through
/// [`OptionId::try_from`] or [`OptionId::ALL`], so an out-of-range index
/// cannot exist. Deserialization runs through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionId(u8);

impl OptionId {
    /// All four options in ascending index order.
    pub const ALL: [Self; OPTION_COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    /// Index into a per-option array.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OptionId {
    type Error = ParipoolError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if usize::from(raw) < OPTION_COUNT {
            Ok(Self(raw))
        } else {
            Err(ParipoolError::InvalidOption(raw))
        }
    }
}

impl From<OptionId> for u8 {
    fn from(id: OptionId) -> Self {
        id.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_id_next() {
        let r = RoundId(5);
        assert_eq!(r.next(), RoundId(6));
        assert_eq!(RoundId::FIRST, RoundId(1));
    }

    #[test]
    fn voter_id_uniqueness() {
        let a = VoterId::new();
        let b = VoterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn voter_id_ordering() {
        let a = VoterId::new();
        let b = VoterId::new();
        assert!(a < b);
    }

    #[test]
    fn option_id_accepts_only_fixed_indices() {
        for raw in 0..4u8 {
            let id = OptionId::try_from(raw).unwrap();
            assert_eq!(id.as_u8(), raw);
        }
        assert!(matches!(
            OptionId::try_from(4),
            Err(ParipoolError::InvalidOption(4))
        ));
        assert!(OptionId::try_from(255).is_err());
    }

    #[test]
    fn option_id_all_is_ascending() {
        let indices: Vec<usize> = OptionId::ALL.iter().map(|o| o.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn option_id_rejects_invalid_on_deserialize() {
        let ok: OptionId = serde_json::from_str("3").unwrap();
        assert_eq!(ok.index(), 3);
        let bad: Result<OptionId, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(RoundId(12).to_string(), "round:12");
        assert_eq!(OptionId::ALL[2].to_string(), "option:2");
    }

    #[test]
    fn serde_roundtrips() {
        let rid = RoundId(42);
        let json = serde_json::to_string(&rid).unwrap();
        let back: RoundId = serde_json::from_str(&json).unwrap();
        assert_eq!(rid, back);

        let vid = VoterId::new();
        let json = serde_json::to_string(&vid).unwrap();
        let back: VoterId = serde_json::from_str(&json).unwrap();
        assert_eq!(vid, back);
    }
}
