//! Lifetime conservation invariant checker.
//!
//! Mathematical invariant enforced after every vote and every settlement:
//! ```text
//! Σ(deposits) - Σ(payouts) == outstanding pool
//! ```
//! where the outstanding pool is the open round's undistributed total, or
//! zero once every round has settled. This is the ultimate safety net: a
//! divergence means value was created, destroyed, or stranded somewhere in
//! the accounting.

use paripool_types::{Amount, ParipoolError, Result};

/// Tracks cumulative deposits and payouts over the engine's lifetime.
///
/// Totals are kept in `u128` so they cannot overflow across an unbounded
/// number of rounds.
pub struct ConservationTracker {
    total_in: u128,
    total_out: u128,
}

impl ConservationTracker {
    /// Create a tracker with zero history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_in: 0,
            total_out: 0,
        }
    }

    /// Record one verified deposit.
    pub fn record_deposit(&mut self, amount: Amount) {
        self.total_in += u128::from(amount);
    }

    /// Record one settlement payout.
    pub fn record_payout(&mut self, amount: Amount) {
        self.total_out += u128::from(amount);
    }

    /// Cumulative deposits since genesis.
    #[must_use]
    pub fn total_deposited(&self) -> u128 {
        self.total_in
    }

    /// Cumulative payouts since genesis.
    #[must_use]
    pub fn total_paid_out(&self) -> u128 {
        self.total_out
    }

    /// Verify that deposits minus payouts equals the outstanding pool.
    ///
    /// # Errors
    /// Returns [`ParipoolError::ConservationViolation`] on any divergence.
    pub fn verify(&self, outstanding: Amount) -> Result<()> {
        let Some(held) = self.total_in.checked_sub(self.total_out) else {
            return Err(ParipoolError::ConservationViolation {
                reason: format!(
                    "payouts {} exceed deposits {}",
                    self.total_out, self.total_in
                ),
            });
        };
        let expected = u128::from(outstanding);
        if held != expected {
            return Err(ParipoolError::ConservationViolation {
                reason: format!(
                    "deposits {} minus payouts {} leaves {held}, expected outstanding {expected}",
                    self.total_in, self.total_out
                ),
            });
        }
        Ok(())
    }
}

impl Default for ConservationTracker {
    fn default() -> Self {
        Self::new()
    }
}
