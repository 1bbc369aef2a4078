use anyhow::{Context, Result};
use chrono::Duration;
use std::env;

/// Engine settings that are not part of per-call screening criteria
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerConfig {
    /// Freshness window of cached screening results; also the width of
    /// the time bucket in the cache key
    pub cache_ttl: Duration,
}

pub const DEFAULT_CACHE_TTL_SECS: i64 = 15 * 60;

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ScreenerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ttl_secs: i64 = lookup("SCREENER_CACHE_TTL_SECS")
            .unwrap_or_else(|| DEFAULT_CACHE_TTL_SECS.to_string())
            .trim()
            .parse()
            .context("SCREENER_CACHE_TTL_SECS must be a whole number of seconds")?;
        anyhow::ensure!(ttl_secs > 0, "SCREENER_CACHE_TTL_SECS must be positive");

        let cache_ttl = Duration::try_seconds(ttl_secs)
            .context("SCREENER_CACHE_TTL_SECS is out of range")?;

        Ok(Self { cache_ttl })
    }
}
