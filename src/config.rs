// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace to watch for SocialBooks, all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Number of parallel reconcile workers sharing the work queue
    pub workers: usize,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            workers: 1,
            backoff_base: Duration::from_millis(5),
            backoff_max: Duration::from_secs(1000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let workers = parse_var(&lookup, "RECONCILE_WORKERS")?.unwrap_or(defaults.workers);
        if workers == 0 {
            bail!("RECONCILE_WORKERS must be at least 1");
        }

        let backoff_base = parse_var::<u64>(&lookup, "BACKOFF_BASE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.backoff_base);
        let backoff_max = parse_var::<u64>(&lookup, "BACKOFF_MAX_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.backoff_max);

        Ok(Config {
            watch_namespace,
            workers,
            backoff_base,
            backoff_max,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .with_context(|| format!("{} has an invalid value: {:?}", key, value))
        })
        .transpose()
}
