//! Error types for the PariPool voting engine.
//!
//! All errors use the `PP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Round lifecycle errors
//! - 2xx: Vote admission errors
//! - 3xx: Custody / gateway errors
//! - 4xx: Settlement integrity errors
//!
//! Every precondition violation is raised before any state mutation or
//! external transfer. The 4xx integrity group marks conditions that should
//! be unreachable while the accounting invariants hold; raising one blocks
//! settlement entirely and leaves funds in custody for manual resolution.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Amount, RoundId, VoterId};

/// Central error enum for all PariPool operations.
#[derive(Debug, Error)]
pub enum ParipoolError {
    // =================================================================
    // Round Lifecycle Errors (1xx)
    // =================================================================
    /// A round is already open; it must be finalized before the next starts.
    #[error("PP_ERR_100: Round already open: {0}")]
    RoundAlreadyOpen(RoundId),

    /// The requested window has a start that is not strictly before its end.
    #[error("PP_ERR_101: Invalid time range: start {starts_at} is not before end {ends_at}")]
    InvalidTimeRange {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },

    /// The requested end time is not strictly in the future.
    #[error("PP_ERR_102: End time not in the future: {ends_at}")]
    EndTimeInPast { ends_at: DateTime<Utc> },

    /// No round has ever been scheduled.
    #[error("PP_ERR_103: No round has been scheduled")]
    NoRound,

    /// The round exists but is outside its active voting window.
    #[error("PP_ERR_104: Round not active: {0}")]
    RoundNotActive(RoundId),

    /// The round has already been finalized.
    #[error("PP_ERR_105: Round already finalized: {0}")]
    AlreadyFinalized(RoundId),

    /// Normal finalize was requested before the end time or capacity trigger.
    #[error("PP_ERR_106: Round still open until {ends_at}")]
    RoundStillOpen { ends_at: DateTime<Utc> },

    /// Labels / capacity cannot change while the round can accept votes.
    #[error("PP_ERR_107: Configuration locked while round {0} can accept votes")]
    ConfigurationLocked(RoundId),

    // =================================================================
    // Vote Admission Errors (2xx)
    // =================================================================
    /// The option index is outside the four fixed options.
    #[error("PP_ERR_200: Invalid option index: {0}")]
    InvalidOption(u8),

    /// Deposit amounts must be strictly positive.
    #[error("PP_ERR_201: Deposit amount must be positive")]
    ZeroAmount,

    /// Each participant may vote at most once per round.
    #[error("PP_ERR_202: Voter {voter} already voted in round {round_id}")]
    DuplicateVote { voter: VoterId, round_id: RoundId },

    /// The round's participant list is at configured capacity.
    #[error("PP_ERR_203: Participant capacity reached: {capacity}")]
    CapacityReached { capacity: usize },

    /// The administrative circuit-breaker has suspended voting.
    #[error("PP_ERR_204: Voting is suspended")]
    VotingSuspended,

    /// Admitting the deposit would overflow the pool total.
    #[error("PP_ERR_205: Pool total would overflow: pool {pool}, deposit {amount}")]
    PoolOverflow { pool: Amount, amount: Amount },

    /// Capacity must admit at least one participant.
    #[error("PP_ERR_206: Capacity must be at least 1")]
    ZeroCapacity,

    // =================================================================
    // Custody / Gateway Errors (3xx)
    // =================================================================
    /// The measured custody delta differs from the requested deposit.
    #[error("PP_ERR_300: Inbound transfer mismatch: requested {requested}, custody received {received}")]
    TransferMismatch { requested: Amount, received: Amount },

    /// The token gateway rejected or failed a transfer.
    #[error("PP_ERR_301: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Recovery is forbidden for the voting asset itself.
    #[error("PP_ERR_302: Cannot recover the voting asset: {0}")]
    ProtectedAsset(String),

    /// A gateway callback re-entered the engine while a transfer was in flight.
    #[error("PP_ERR_303: Reentrant engine call rejected")]
    ReentrantCall,

    /// A transfer was requested for more than the source holds.
    #[error("PP_ERR_304: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    // =================================================================
    // Settlement Integrity Errors (4xx)
    // =================================================================
    /// The pool is positive but the winning option carries zero weight.
    #[error("PP_ERR_400: Invariant violation: pool {pool} positive but winner weight zero in round {round_id}")]
    ZeroWinnerWeight { round_id: RoundId, pool: Amount },

    /// The pool is positive but no vote targets the winning option.
    #[error("PP_ERR_401: Invariant violation: no qualifying voters for the outcome in round {round_id}")]
    NoQualifyingVoters { round_id: RoundId },

    /// Planned payouts do not sum to the pool exactly.
    #[error("PP_ERR_402: Distribution mismatch: payouts sum to {actual}, pool is {expected}")]
    DistributionMismatch { expected: Amount, actual: u128 },

    /// Lifetime deposits minus payouts diverged from the outstanding pool.
    #[error("PP_ERR_403: Conservation violation: {reason}")]
    ConservationViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ParipoolError>;
