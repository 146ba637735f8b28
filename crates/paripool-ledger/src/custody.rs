//! Custody-measured inbound deposits.
//!
//! The engine never trusts a token's declared transfer semantics. Each
//! deposit is requested and then the realized custody delta is measured;
//! any difference fails the vote before a single aggregate changes, which
//! keeps fee-taking and rebasing assets out of the pool arithmetic.

use paripool_types::{Amount, ParipoolError, Result, VoterId};

use crate::gateway::TokenGateway;

/// Pull `amount` from the participant and verify custody grew by exactly
/// that much.
///
/// On a mismatch the engine records nothing; whatever the token actually
/// delivered stays in custody pending manual intervention.
pub fn deposit_verified<G: TokenGateway>(
    gateway: &mut G,
    from: VoterId,
    amount: Amount,
) -> Result<()> {
    let before = gateway.custody_balance();
    gateway.transfer_in(from, amount)?;
    let received = gateway.custody_balance().saturating_sub(before);

    if received != amount {
        tracing::warn!(
            voter = %from,
            requested = amount,
            received,
            "Inbound transfer mismatch, rejecting vote"
        );
        return Err(ParipoolError::TransferMismatch {
            requested: amount,
            received,
        });
    }

    Ok(())
}
