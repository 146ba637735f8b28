//! Vote records and the round-tagging storage convention.

use serde::{Deserialize, Serialize};

use crate::ids::{OptionId, RoundId, VoterId};

/// A deposit amount in the voting asset's smallest indivisible unit.
///
/// All pool arithmetic is integer arithmetic on this type; pro-rata shares
/// widen through `u128` so the multiply never overflows.
pub type Amount = u64;

/// One participant's vote, tagged with the round it was cast in.
///
/// Per-participant vote storage is never wiped between rounds. A stored
/// record is logically present only while `round_id` matches the current
/// round; a stale tag reads as "no vote" and is overwritten in place the
/// next time the participant votes. Round reset therefore costs O(1)
/// regardless of how many participants have ever voted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The round this record belongs to.
    pub round_id: RoundId,
    /// The option the deposit backs.
    pub option: OptionId,
    /// Deposited amount, strictly positive.
    pub amount: Amount,
}

impl VoteRecord {
    #[must_use]
    pub fn new(round_id: RoundId, option: OptionId, amount: Amount) -> Self {
        Self {
            round_id,
            option,
            amount,
        }
    }
}

/// Settlement-facing projection of one admitted vote.
///
/// The engine materializes these in original vote order; the distribution
/// planner never sees stale-tagged records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVote {
    pub voter: VoterId,
    pub option: OptionId,
    pub amount: Amount,
}

impl CastVote {
    #[must_use]
    pub fn new(voter: VoterId, option: OptionId, amount: Amount) -> Self {
        Self {
            voter,
            option,
            amount,
        }
    }

    /// Test helper: a cast vote from a fresh voter.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn dummy(option: u8, amount: Amount) -> Self {
        Self {
            voter: VoterId::new(),
            option: OptionId::try_from(option).expect("test option index in range"),
            amount,
        }
    }
}
