//! Reentrancy exclusion for gateway-calling entry points.
//!
//! Token gateways run foreign code. A misbehaving token could call back
//! into the engine mid-transfer and observe half-applied state. Every entry
//! point that reaches the gateway therefore holds a [`ReentryGuard`] for its
//! full duration; a nested acquisition fails with
//! [`ParipoolError::ReentrantCall`] instead of proceeding.

use std::sync::atomic::{AtomicBool, Ordering};

use paripool_types::{ParipoolError, Result};

/// One-slot mutual exclusion flag for engine entry points.
#[derive(Debug, Default)]
pub struct ReentryFlag {
    entered: AtomicBool,
}

impl ReentryFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the flag for the lifetime of the returned guard.
    ///
    /// # Errors
    /// Returns [`ParipoolError::ReentrantCall`] if the flag is already held.
    pub fn enter(&self) -> Result<ReentryGuard<'_>> {
        if self.entered.swap(true, Ordering::AcqRel) {
            return Err(ParipoolError::ReentrantCall);
        }
        Ok(ReentryGuard {
            flag: &self.entered,
        })
    }

    /// True while some entry point holds the guard.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop, covering early returns and error paths alike.
#[derive(Debug)]
pub struct ReentryGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
