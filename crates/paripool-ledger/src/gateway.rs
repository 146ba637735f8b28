//! The token gateway: custody's boundary with the outside world.
//!
//! Inbound transfers are never trusted to deliver what they claim; the
//! custody module measures the realized balance delta instead (see
//! [`crate::custody`]). Outbound transfers are expected to move exactly the
//! requested amount or fail the whole call, with no partial state.

#[cfg(any(test, feature = "test-helpers"))]
use std::collections::HashMap;

use paripool_types::{Amount, Result, VoterId};
#[cfg(any(test, feature = "test-helpers"))]
use paripool_types::ParipoolError;

/// Moves the voting asset in and out of engine custody.
pub trait TokenGateway {
    /// Symbol of the voting asset held in custody.
    fn asset_symbol(&self) -> &str;

    /// Current custody balance of the voting asset.
    fn custody_balance(&self) -> Amount;

    /// Pull `amount` from the participant into custody.
    fn transfer_in(&mut self, from: VoterId, amount: Amount) -> Result<()>;

    /// Pay `amount` out of custody to the recipient.
    fn transfer_out(&mut self, to: VoterId, amount: Amount) -> Result<()>;

    /// Sweep a non-voting asset out of custody.
    fn recover_asset(&mut self, asset: &str, to: VoterId, amount: Amount) -> Result<()>;
}

/// In-memory reference token for tests.
///
/// Behaves like a standard asset by default. `with_inbound_skim` turns it
/// into a fee-taking token that delivers less than requested on every
/// inbound transfer, which the custody measurement must catch.
#[cfg(any(test, feature = "test-helpers"))]
pub struct InMemoryToken {
    asset: String,
    balances: HashMap<VoterId, Amount>,
    custody: Amount,
    inbound_skim: Amount,
    foreign_custody: HashMap<String, Amount>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl InMemoryToken {
    #[must_use]
    pub fn new(asset: &str) -> Self {
        Self {
            asset: asset.to_string(),
            balances: HashMap::new(),
            custody: 0,
            inbound_skim: 0,
            foreign_custody: HashMap::new(),
        }
    }

    /// A fee-taking token: every inbound transfer delivers `skim` less than
    /// requested, the difference vanishing as a fee.
    #[must_use]
    pub fn with_inbound_skim(asset: &str, skim: Amount) -> Self {
        let mut token = Self::new(asset);
        token.inbound_skim = skim;
        token
    }

    /// Seed a participant's wallet.
    pub fn mint(&mut self, voter: VoterId, amount: Amount) {
        *self.balances.entry(voter).or_default() += amount;
    }

    /// Strand some of a foreign asset in custody.
    pub fn seed_foreign(&mut self, asset: &str, amount: Amount) {
        *self.foreign_custody.entry(asset.to_string()).or_default() += amount;
    }

    #[must_use]
    pub fn balance_of(&self, voter: VoterId) -> Amount {
        self.balances.get(&voter).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn foreign_balance(&self, asset: &str) -> Amount {
        self.foreign_custody.get(asset).copied().unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl TokenGateway for InMemoryToken {
    fn asset_symbol(&self) -> &str {
        &self.asset
    }

    fn custody_balance(&self) -> Amount {
        self.custody
    }

    fn transfer_in(&mut self, from: VoterId, amount: Amount) -> Result<()> {
        let balance = self.balances.entry(from).or_default();
        if *balance < amount {
            return Err(ParipoolError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        let delivered = amount.saturating_sub(self.inbound_skim);
        self.custody = self
            .custody
            .checked_add(delivered)
            .ok_or(ParipoolError::TransferFailed {
                reason: "custody balance overflow".to_string(),
            })?;
        Ok(())
    }

    fn transfer_out(&mut self, to: VoterId, amount: Amount) -> Result<()> {
        if self.custody < amount {
            return Err(ParipoolError::InsufficientFunds {
                needed: amount,
                available: self.custody,
            });
        }
        self.custody -= amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    fn recover_asset(&mut self, asset: &str, _to: VoterId, amount: Amount) -> Result<()> {
        let held = self.foreign_custody.entry(asset.to_string()).or_default();
        if *held < amount {
            return Err(ParipoolError::InsufficientFunds {
                needed: amount,
                available: *held,
            });
        }
        *held -= amount;
        Ok(())
    }
}
