//! # paripool-ledger
//!
//! **Custody Plane**: vote admission, deposit verification, round-tagged
//! vote storage, and lifetime conservation tracking.
//!
//! ## Architecture
//!
//! The Custody Plane sits between the engine facade and the settlement
//! planner:
//! 1. **VoteTable**: round-tagged storage, one slot per voter, never cleared
//! 2. **DepositLedger**: hard gate, validates a vote against the open round
//! 3. **custody**: measures each inbound transfer by custody delta
//! 4. **TokenGateway**: the only seam through which tokens move
//! 5. **ConservationTracker**: lifetime deposits minus payouts must equal
//!    the outstanding pool
//!
//! ## Vote Flow
//!
//! ```text
//! Engine → DepositLedger.validate() → custody::deposit_verified()
//!        → DepositLedger.record() → VoteTable + Round tallies/pool
//! ```
//!
//! Every token credited to the pool **must** have been measured arriving.

pub mod conservation;
pub mod custody;
pub mod deposit;
pub mod gateway;
pub mod vote_table;

pub use conservation::ConservationTracker;
pub use custody::deposit_verified;
pub use deposit::DepositLedger;
pub use gateway::TokenGateway;
pub use vote_table::VoteTable;

#[cfg(any(test, feature = "test-helpers"))]
pub use gateway::InMemoryToken;
