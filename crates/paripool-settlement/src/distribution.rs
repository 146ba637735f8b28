//! Parimutuel distribution planning.
//!
//! Given a finished round and its votes in admission order, produces the
//! complete payout schedule for the winning option. Planning is pure: no
//! state is touched and no tokens move until the engine commits the plan.

use paripool_types::{Amount, CastVote, OptionId, ParipoolError, Result, Round, RoundId, VoterId};

use crate::digest::compute_settlement_digest;
use crate::outcome::select_outcome;

/// One payout owed to a single winning voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutInstruction {
    /// Recipient of the payout.
    pub voter: VoterId,
    /// Amount owed, in the asset's smallest unit.
    pub amount: Amount,
}

/// Complete settlement schedule for one round.
///
/// A plan is produced, verified, and only then committed. It contains
/// everything the engine needs to finalize the round and drive payouts.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    /// Round the plan settles.
    pub round_id: RoundId,
    /// Winning option.
    pub outcome: OptionId,
    /// Pool total being distributed.
    pub pool: Amount,
    /// The winning option's aggregated stake, the pro-rata denominator.
    pub winner_total: Amount,
    /// Number of voters receiving a payout.
    pub winner_count: usize,
    /// Payouts in vote-admission order. The final entry absorbs the
    /// rounding remainder.
    pub payouts: Vec<PayoutInstruction>,
    /// Digest binding the plan contents for audit snapshots.
    pub digest: [u8; 32],
}

/// Plan the settlement of a round with a non-zero pool.
///
/// Algorithm:
/// 1. Select the winning option by plurality over the final tallies
/// 2. Pass one: collect the votes backing the winner, in admission order;
///    the last of them becomes the remainder absorber
/// 3. Pass two: pay every other winner `floor(stake * pool / winner_total)`
///    using a wide multiply, then hand the absorber `pool - distributed`
///
/// The remainder handoff guarantees the payouts sum to exactly the pool
/// despite per-share truncation; [`verify_exact_distribution`] recomputes
/// that sum as an independent gate before anything is committed.
///
/// # Errors
/// Fails when the winning option carries zero stake or no vote backs it.
/// Neither state is reachable for a round whose votes produced its tallies;
/// the checks exist to fail closed on inconsistent input.
pub fn plan_settlement(round: &Round, votes: &[CastVote]) -> Result<SettlementPlan> {
    let outcome = select_outcome(&round.tallies);
    let pool = round.pool;

    let winner_total = round.tallies.get(outcome);
    if winner_total == 0 {
        return Err(ParipoolError::ZeroWinnerWeight {
            round_id: round.id,
            pool,
        });
    }

    let winners: Vec<&CastVote> = votes.iter().filter(|vote| vote.option == outcome).collect();
    let Some((absorber, leading)) = winners.split_last() else {
        return Err(ParipoolError::NoQualifyingVoters { round_id: round.id });
    };

    let mut payouts = Vec::with_capacity(winners.len());
    let mut distributed: u128 = 0;
    for vote in leading {
        let share = floor_share(vote.amount, pool, winner_total);
        distributed += u128::from(share);
        payouts.push(PayoutInstruction {
            voter: vote.voter,
            amount: share,
        });
    }

    // The absorber takes whatever truncation left behind.
    let remainder = u128::from(pool)
        .checked_sub(distributed)
        .and_then(|left| Amount::try_from(left).ok())
        .ok_or(ParipoolError::DistributionMismatch {
            expected: pool,
            actual: distributed,
        })?;
    payouts.push(PayoutInstruction {
        voter: absorber.voter,
        amount: remainder,
    });

    let digest = compute_settlement_digest(round.id, outcome, pool, &payouts);

    Ok(SettlementPlan {
        round_id: round.id,
        outcome,
        pool,
        winner_total,
        winner_count: winners.len(),
        payouts,
        digest,
    })
}

/// Verify that a plan's payouts sum to exactly its pool.
///
/// Recomputes the total in wide arithmetic rather than trusting the
/// running figure the planner accumulated.
///
/// # Errors
/// Returns [`ParipoolError::DistributionMismatch`] when the totals diverge.
pub fn verify_exact_distribution(plan: &SettlementPlan) -> Result<()> {
    let actual: u128 = plan
        .payouts
        .iter()
        .map(|payout| u128::from(payout.amount))
        .sum();
    if actual != u128::from(plan.pool) {
        return Err(ParipoolError::DistributionMismatch {
            expected: plan.pool,
            actual,
        });
    }
    Ok(())
}

/// `floor(stake * pool / winner_total)` without intermediate overflow.
fn floor_share(stake: Amount, pool: Amount, winner_total: Amount) -> Amount {
    let wide = u128::from(stake) * u128::from(pool) / u128::from(winner_total);
    // A stake never exceeds winner_total, bounding the quotient by pool.
    Amount::try_from(wide).unwrap_or(Amount::MAX)
}
