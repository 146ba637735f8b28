//! # paripool-settlement
//!
//! **Pure deterministic settlement planner for PariPool.**
//!
//! The settlement plane takes a finished round and its votes and produces
//! a complete payout schedule. It has:
//!
//! - **Zero side effects**: no custody access, no transfers, no state writes
//! - **Deterministic output**: same round state -> same plan and digest
//! - **Exact distribution**: payouts always sum to the pool, to the unit
//! - **Lowest-index tie-break**: equal tallies never displace an earlier
//!   option

pub mod digest;
pub mod distribution;
pub mod outcome;

pub use digest::{compute_settlement_digest, verify_settlement_digest};
pub use distribution::{PayoutInstruction, SettlementPlan, plan_settlement, verify_exact_distribution};
pub use outcome::select_outcome;
