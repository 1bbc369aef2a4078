//! Time-bucketed result cache.
//!
//! Keys carry the criteria fields that shape the candidate set (sector,
//! minimum ROE, P/E multiplier, minimum revenue growth) plus the current
//! TTL window number. Other criteria fields are not part of the key, so two
//! calls differing only in, say, `max_debt_to_equity` share an entry.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use screening_core::{ScoredStock, ScreeningCriteria};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    sector: String,
    min_roe: u64,
    max_pe_multiplier: u64,
    min_revenue_growth: u64,
    bucket: i64,
}

/// Bit pattern of a float with -0.0 folded into 0.0
fn normalized_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

impl CacheKey {
    pub fn new(criteria: &ScreeningCriteria, now: DateTime<Utc>, ttl: Duration) -> Self {
        let window = ttl.num_milliseconds().max(1);
        Self {
            sector: criteria.sector.clone(),
            min_roe: normalized_bits(criteria.min_roe),
            max_pe_multiplier: normalized_bits(criteria.max_pe_multiplier),
            min_revenue_growth: normalized_bits(criteria.min_revenue_growth),
            bucket: now.timestamp_millis().div_euclid(window),
        }
    }

    pub fn bucket(&self) -> i64 {
        self.bucket
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

pub struct ResultCache {
    entries: DashMap<CacheKey, CacheEntry<Vec<ScoredStock>>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - cached_at < self.ttl
    }

    /// Fresh entry for `key`, if any. An expired entry is evicted on read.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Vec<ScoredStock>> {
        let expired = match self.entries.get(key) {
            Some(entry) if self.is_fresh(entry.cached_at, now) => {
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // Only drop it if no concurrent writer has refreshed it meanwhile
            let evicted = self
                .entries
                .remove_if(key, |_, entry| !self.is_fresh(entry.cached_at, now));
            if evicted.is_some() {
                tracing::debug!("Evicted expired screening result for {}", key.sector);
            }
        }
        None
    }

    /// Store a result. Entries from earlier time buckets can never be read
    /// again and are dropped here.
    pub fn insert(&self, key: CacheKey, data: Vec<ScoredStock>, now: DateTime<Utc>) {
        let bucket = key.bucket;
        self.entries.retain(|k, _| k.bucket >= bucket);
        self.entries.insert(
            key,
            CacheEntry {
                data,
                cached_at: now,
            },
        );
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| self.is_fresh(entry.cached_at, now));
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
