//! # paripool-engine
//!
//! **Composition Plane**: the [`PoolEngine`] facade that owns the current
//! round and drives the other planes.
//!
//! ## Architecture
//!
//! ```text
//! callers → PoolEngine (this crate)
//!             ├─ paripool-ledger      admission, custody measurement
//!             ├─ paripool-settlement  pure outcome + distribution planning
//!             └─ TokenGateway         the asset boundary
//! ```
//!
//! One engine value serializes every operation. Entry points that reach the
//! gateway hold a [`ReentryGuard`] so a token calling back in mid-transfer
//! fails fast instead of observing half-applied state, and settlement
//! commits round state before the first outbound payout.

pub mod engine;
pub mod reentry;

pub use engine::PoolEngine;
pub use reentry::{ReentryFlag, ReentryGuard};
