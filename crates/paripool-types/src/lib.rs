//! # paripool-types
//!
//! Shared types, errors, and configuration for the **PariPool** voting and
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RoundId`], [`VoterId`], [`OptionId`]
//! - **Round model**: [`Round`], [`OptionTallies`]
//! - **Vote model**: [`VoteRecord`], [`CastVote`], [`Amount`]
//! - **Result model**: [`RoundResult`]
//! - **Event model**: [`PoolEvent`]
//! - **Configuration**: [`PoolConfig`]
//! - **Errors**: [`ParipoolError`] with `PP_ERR_` prefix codes
//! - **Constants**: option count, defaults, digest domain

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod result;
pub mod round;
pub mod vote;

// Re-export all primary types at crate root for ergonomic imports:
//   use paripool_types::{Round, OptionId, PoolEvent, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use result::*;
pub use round::*;
pub use vote::*;

// Constants are accessed via `paripool_types::constants::FOO`
// (not re-exported to avoid name collisions).
