//! Deposit ledger: vote admission and recording.
//!
//! Admission is split from recording so that every rule is checked before
//! the custody transfer runs; once a deposit has been verified, recording
//! cannot fail and the vote commits in full.
//!
//! ## Design Principles
//!
//! - **Fail-fast**: every admission rule is checked before any mutation
//! - **One vote per participant per round**, regardless of option or amount
//! - **No clearing**: per-participant slots are reused across rounds via
//!   round-id tags

use paripool_types::{
    Amount, CastVote, OptionId, ParipoolError, Result, Round, RoundId, VoteRecord, VoterId,
};

use crate::vote_table::VoteTable;

/// Admission rules and vote recording over the round-tagged [`VoteTable`].
pub struct DepositLedger {
    table: VoteTable,
}

impl DepositLedger {
    /// Create a ledger with an empty vote table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: VoteTable::new(),
        }
    }

    /// Check every admission rule for a prospective vote.
    ///
    /// # Errors
    /// Returns the specific error for the first rule that fails.
    pub fn validate(
        &self,
        round: &Round,
        voter: VoterId,
        amount: Amount,
        capacity: usize,
    ) -> Result<()> {
        // 1. One vote per participant per round
        if self.table.vote_for(round.id, voter).is_some() {
            return Err(ParipoolError::DuplicateVote {
                voter,
                round_id: round.id,
            });
        }

        // 2. Participant capacity
        if round.is_full(capacity) {
            return Err(ParipoolError::CapacityReached { capacity });
        }

        // 3. Pool headroom, so recording after the transfer cannot fail
        if round.pool.checked_add(amount).is_none() {
            return Err(ParipoolError::PoolOverflow {
                pool: round.pool,
                amount,
            });
        }

        Ok(())
    }

    /// Commit an admitted vote: tag the slot, credit the tallies and pool,
    /// append the voter to the round's vote list.
    ///
    /// Callers run [`DepositLedger::validate`] first. The credit happens
    /// before the slot write, so a failed credit leaves the ledger and the
    /// round both untouched.
    pub fn record(
        &mut self,
        round: &mut Round,
        voter: VoterId,
        option: OptionId,
        amount: Amount,
    ) -> Result<()> {
        round.credit(option, amount)?;
        self.table
            .record(voter, VoteRecord::new(round.id, option, amount));
        round.voters.push(voter);
        Ok(())
    }

    /// A participant's vote in the given round, if any.
    #[must_use]
    pub fn vote_of(&self, round_id: RoundId, voter: VoterId) -> Option<&VoteRecord> {
        self.table.vote_for(round_id, voter)
    }

    /// Materialize the round's admitted votes in original vote order.
    ///
    /// Slots whose tag does not match the round are skipped; the settlement
    /// planner never sees stale records.
    #[must_use]
    pub fn cast_votes(&self, round: &Round) -> Vec<CastVote> {
        round
            .voters
            .iter()
            .filter_map(|&voter| {
                self.table
                    .vote_for(round.id, voter)
                    .map(|rec| CastVote::new(voter, rec.option, rec.amount))
            })
            .collect()
    }

    /// Number of participants ever recorded, across all rounds.
    #[must_use]
    pub fn tracked_participants(&self) -> usize {
        self.table.tracked_participants()
    }
}

impl Default for DepositLedger {
    fn default() -> Self {
        Self::new()
    }
}
