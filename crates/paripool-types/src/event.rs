//! Engine events: the observable audit trail of the voting pool.
//!
//! Every externally visible action (round opened, vote admitted, settlement,
//! payout, administrative change) appends one [`PoolEvent`] to the engine's
//! event log. The log is the normative record; `tracing` emissions mirror it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::OPTION_COUNT;
use crate::ids::{OptionId, RoundId, VoterId};
use crate::vote::Amount;

/// One externally visible engine action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// A new round was opened.
    RoundStarted {
        round_id: RoundId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
    /// A vote was admitted and its deposit credited.
    VoteRecorded {
        round_id: RoundId,
        voter: VoterId,
        option: OptionId,
        amount: Amount,
    },
    /// A round was settled and closed.
    RoundFinalized {
        round_id: RoundId,
        outcome: OptionId,
        pool: Amount,
        winner_total: Amount,
        winner_count: usize,
    },
    /// One settlement transfer left custody.
    Payout {
        round_id: RoundId,
        recipient: VoterId,
        amount: Amount,
    },
    /// Option display labels changed.
    LabelsUpdated {
        labels: [String; OPTION_COUNT],
    },
    /// Per-round participant capacity changed.
    CapacityUpdated {
        capacity: usize,
    },
    /// The circuit-breaker suspended vote admission.
    VotingSuspended,
    /// The circuit-breaker reopened vote admission.
    VotingResumed,
    /// A non-voting asset was swept out of custody.
    ForeignAssetRecovered {
        asset: String,
        to: VoterId,
        amount: Amount,
    },
}

impl PoolEvent {
    /// Stable uppercase tag for log lines and assertions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoundStarted { .. } => "ROUND_STARTED",
            Self::VoteRecorded { .. } => "VOTE_RECORDED",
            Self::RoundFinalized { .. } => "ROUND_FINALIZED",
            Self::Payout { .. } => "PAYOUT",
            Self::LabelsUpdated { .. } => "LABELS_UPDATED",
            Self::CapacityUpdated { .. } => "CAPACITY_UPDATED",
            Self::VotingSuspended => "VOTING_SUSPENDED",
            Self::VotingResumed => "VOTING_RESUMED",
            Self::ForeignAssetRecovered { .. } => "FOREIGN_ASSET_RECOVERED",
        }
    }
}

impl std::fmt::Display for PoolEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
