//! The result snapshot of the most recently finalized round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OptionId, RoundId};
use crate::vote::Amount;

/// Snapshot written exactly once per round, at finalization.
///
/// Only the latest snapshot is retained; starting the next round leaves it
/// untouched, so the previous round's outcome stays queryable until the
/// round after that settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// The finalized round.
    pub round_id: RoundId,
    /// The winning option.
    pub outcome: OptionId,
    /// Display label of the winning option at settlement time.
    pub outcome_label: String,
    /// Total amount paid out; equals the pool exactly, zero for an empty round.
    pub distributed: Amount,
    /// Number of participants who voted for the outcome.
    pub winner_count: usize,
    /// Scheduled end of the round's voting window.
    pub ended_at: DateTime<Utc>,
    /// When settlement actually ran.
    pub settled_at: DateTime<Utc>,
    /// SHA-256 commitment over the ordered payout set.
    pub digest: [u8; 32],
}

impl RoundResult {
    /// Hex rendering of the settlement digest for logs and display.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}
