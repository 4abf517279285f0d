// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-key exponential backoff for failed reconciliations

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Tracks consecutive failures per key and derives the next retry delay
/// as `base * 2^failures`, capped at `max`.
#[derive(Debug)]
pub struct ExponentialBackoff<K> {
    base: Duration,
    max: Duration,
    failures: HashMap<K, u32>,
}

impl<K: Eq + Hash + Clone> ExponentialBackoff<K> {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: HashMap::new(),
        }
    }

    /// Record a failure for `key` and return how long to wait before retrying it
    pub fn when(&mut self, key: &K) -> Duration {
        let failures = self.failures.entry(key.clone()).or_insert(0);
        let exponent = *failures;
        *failures = failures.saturating_add(1);

        match 2u32
            .checked_pow(exponent)
            .and_then(|factor| self.base.checked_mul(factor))
        {
            Some(backoff) if backoff < self.max => backoff,
            _ => self.max,
        }
    }

    /// Reset the failure count for `key`
    pub fn forget(&mut self, key: &K) {
        self.failures.remove(key);
    }

    pub fn num_requeues(&self, key: &K) -> u32 {
        self.failures.get(key).copied().unwrap_or(0)
    }
}

impl<K: Eq + Hash + Clone> Default for ExponentialBackoff<K> {
    fn default() -> Self {
        Self::new(Duration::from_millis(5), Duration::from_secs(1000))
    }
}
