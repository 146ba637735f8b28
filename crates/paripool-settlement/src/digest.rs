//! Settlement digest utilities for audit snapshots.
//!
//! Every settlement of the same round state must produce the exact same
//! payout schedule. The digest is a hash over the plan's identifying
//! fields and ordered payouts that lets a snapshot be checked against a
//! recomputed plan without comparing full payloads.

use paripool_types::constants::SETTLEMENT_DIGEST_DOMAIN;
use paripool_types::{Amount, OptionId, RoundId};
use sha2::{Digest, Sha256};

use crate::distribution::{PayoutInstruction, SettlementPlan};

/// Compute the digest over a settlement's payout schedule.
///
/// The hash binds:
/// - The round identifier and winning option
/// - The pool total
/// - Every payout, recipient and amount, in order
///
/// The same schedule always produces the same digest.
#[must_use]
pub fn compute_settlement_digest(
    round_id: RoundId,
    outcome: OptionId,
    pool: Amount,
    payouts: &[PayoutInstruction],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SETTLEMENT_DIGEST_DOMAIN);
    hasher.update(round_id.0.to_le_bytes());
    hasher.update([outcome.as_u8()]);
    hasher.update(pool.to_le_bytes());
    hasher.update((payouts.len() as u64).to_le_bytes());

    for payout in payouts {
        hasher.update(payout.voter.0.as_bytes());
        hasher.update(payout.amount.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// Verify that a plan's embedded digest matches its contents.
///
/// Recomputes the hash from the plan fields and compares.
#[must_use]
pub fn verify_settlement_digest(plan: &SettlementPlan) -> bool {
    let actual =
        compute_settlement_digest(plan.round_id, plan.outcome, plan.pool, &plan.payouts);
    actual == plan.digest
}
