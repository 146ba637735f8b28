//! The per-round aggregate: voting window, option tallies, pool, vote list.
//!
//! Exactly one `Round` exists at a time. It is created with empty aggregates,
//! mutated only by vote admission, closed exactly once by settlement, and
//! replaced wholesale when the next round starts. The per-participant vote
//! table lives outside this aggregate and survives the replacement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::OPTION_COUNT;
use crate::error::{ParipoolError, Result};
use crate::ids::{OptionId, RoundId, VoterId};
use crate::vote::Amount;

// ---------------------------------------------------------------------------
// OptionTallies
// ---------------------------------------------------------------------------

/// Aggregated deposit weight per option, indexed 0 to 3.
///
/// The inner array is private so every mutation runs through the checked
/// [`OptionTallies::credit`] path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTallies([Amount; OPTION_COUNT]);

impl OptionTallies {
    /// All four tallies at zero.
    pub const ZERO: Self = Self([0; OPTION_COUNT]);

    /// The aggregated weight behind one option.
    #[must_use]
    pub fn get(&self, option: OptionId) -> Amount {
        self.0[option.index()]
    }

    /// Add `amount` to one option's tally.
    pub fn credit(&mut self, option: OptionId, amount: Amount) -> Result<()> {
        let slot = &mut self.0[option.index()];
        *slot = slot
            .checked_add(amount)
            .ok_or(ParipoolError::PoolOverflow {
                pool: *slot,
                amount,
            })?;
        Ok(())
    }

    /// Sum of all four tallies, widened so unvalidated values cannot
    /// overflow the check itself.
    #[must_use]
    pub fn sum(&self) -> u128 {
        self.0.iter().map(|&a| u128::from(a)).sum()
    }

    /// Copy of the underlying per-option array, in index order.
    #[must_use]
    pub fn as_array(&self) -> [Amount; OPTION_COUNT] {
        self.0
    }
}

impl Default for OptionTallies {
    fn default() -> Self {
        Self::ZERO
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One voting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Monotonically increasing identifier, never zero.
    pub id: RoundId,
    /// Start of the active voting window (inclusive).
    pub starts_at: DateTime<Utc>,
    /// End of the active voting window (inclusive).
    pub ends_at: DateTime<Utc>,
    /// Set exactly once, by settlement.
    pub finalized: bool,
    /// Aggregated deposit weight per option.
    pub tallies: OptionTallies,
    /// Total deposited amount; always equals the sum of the tallies.
    pub pool: Amount,
    /// Participants in original vote order.
    pub voters: Vec<VoterId>,
    /// The winning option; present only after finalization.
    pub outcome: Option<OptionId>,
}

impl Round {
    /// A freshly opened round with all aggregates zero / empty.
    #[must_use]
    pub fn open(id: RoundId, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self {
            id,
            starts_at,
            ends_at,
            finalized: false,
            tallies: OptionTallies::ZERO,
            pool: 0,
            voters: Vec::new(),
            outcome: None,
        }
    }

    /// True while votes can be admitted: unfinalized and `now` inside the
    /// window, inclusive at both ends.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.finalized && self.starts_at <= now && now <= self.ends_at
    }

    /// True once `now` is strictly past the window end. At exactly
    /// `ends_at` the round is still active, not ended.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }

    /// True once the vote list has reached `capacity`.
    #[must_use]
    pub fn is_full(&self, capacity: usize) -> bool {
        self.voters.len() >= capacity
    }

    /// The active voting window as `(start, end)`.
    #[must_use]
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.starts_at, self.ends_at)
    }

    /// Credit a deposit to one option and the pool, both or neither.
    pub fn credit(&mut self, option: OptionId, amount: Amount) -> Result<()> {
        let new_pool = self
            .pool
            .checked_add(amount)
            .ok_or(ParipoolError::PoolOverflow {
                pool: self.pool,
                amount,
            })?;
        self.tallies.credit(option, amount)?;
        self.pool = new_pool;
        Ok(())
    }

    /// Check that the tallies sum to the pool exactly.
    pub fn verify_conservation(&self) -> Result<()> {
        let sum = self.tallies.sum();
        if sum == u128::from(self.pool) {
            Ok(())
        } else {
            Err(ParipoolError::ConservationViolation {
                reason: format!(
                    "{} tallies sum to {sum}, pool is {}",
                    self.id, self.pool
                ),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
