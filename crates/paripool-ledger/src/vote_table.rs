//! Round-tagged per-participant vote storage.
//!
//! The table is never cleared. Each participant owns at most one slot,
//! overwritten in place on their next vote; the round id stored in the slot
//! decides whether the record is visible for the current round. Starting a
//! new round therefore costs O(1) no matter how many participants have
//! ever voted.

use std::collections::HashMap;

use paripool_types::{RoundId, VoteRecord, VoterId};

/// Per-participant vote slots, keyed by voter, tagged by round.
pub struct VoteTable {
    entries: HashMap<VoterId, VoteRecord>,
}

impl VoteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store or overwrite the participant's slot.
    pub fn record(&mut self, voter: VoterId, record: VoteRecord) {
        self.entries.insert(voter, record);
    }

    /// The participant's vote for `round_id`.
    ///
    /// A slot whose tag differs from `round_id` is a leftover from an
    /// earlier round and reads as absent.
    #[must_use]
    pub fn vote_for(&self, round_id: RoundId, voter: VoterId) -> Option<&VoteRecord> {
        self.entries
            .get(&voter)
            .filter(|record| record.round_id == round_id)
    }

    /// Number of slots ever written, stale tags included.
    #[must_use]
    pub fn tracked_participants(&self) -> usize {
        self.entries.len()
    }
}

impl Default for VoteTable {
    fn default() -> Self {
        Self::new()
    }
}
