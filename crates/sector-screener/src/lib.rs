//! Sector-relative stock screening engine.
//!
//! Finds stocks that trade cheaply against their sector peers while clearing
//! financial-health and growth gates, then ranks them by a weighted,
//! explainable composite score. Results are cached per criteria snapshot and
//! time window.

pub mod cache;
pub mod config;
pub mod filters;
pub mod presets;
pub mod scoring;
pub mod statistics;
pub mod valuation;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use screening_core::{
    ScoredStock, Screener, ScreeningCriteria, ScreeningError, SectorStatistics, StockRecord,
};

pub use cache::{CacheKey, ResultCache};
pub use config::ScreenerConfig;
pub use filters::{evaluate, filter_candidates, Rejection};
pub use presets::{criteria_for_sector, criteria_with_overrides, sector_preset, SectorPreset};
pub use scoring::{score_and_rank, WEIGHTS};
pub use statistics::calculate_sector_statistics;
pub use valuation::estimate_valuation;

pub struct SectorScreener {
    cache: ResultCache,
    /// Most recent baseline per sector, for callers that display it
    sector_stats: DashMap<String, SectorStatistics>,
}

impl SectorScreener {
    pub fn new() -> Self {
        Self::with_config(ScreenerConfig::default())
    }

    pub fn with_config(config: ScreenerConfig) -> Self {
        Self {
            cache: ResultCache::new(config.cache_ttl),
            sector_stats: DashMap::new(),
        }
    }

    /// Screen `stocks` against `criteria`, serving a cached result when one
    /// exists for the same key and `force_refresh` is not set.
    pub fn screen_stocks(
        &self,
        criteria: &ScreeningCriteria,
        stocks: &[StockRecord],
    ) -> Result<Vec<ScoredStock>, ScreeningError> {
        self.screen_stocks_at(criteria, stocks, Utc::now())
    }

    /// Same as [`screen_stocks`](Self::screen_stocks) with an explicit clock.
    pub fn screen_stocks_at(
        &self,
        criteria: &ScreeningCriteria,
        stocks: &[StockRecord],
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredStock>, ScreeningError> {
        criteria.validate()?;

        let key = CacheKey::new(criteria, now, self.cache.ttl());
        if !criteria.force_refresh {
            if let Some(cached) = self.cache.get(&key, now) {
                tracing::debug!(
                    "Cache hit for {} screen ({} results)",
                    criteria.sector,
                    cached.len()
                );
                return Ok(cached);
            }
        }
        tracing::debug!(
            "Computing fresh {} screen (force_refresh: {})",
            criteria.sector,
            criteria.force_refresh
        );

        let stats = match calculate_sector_statistics(stocks, &criteria.sector) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Screening aborted: {}", e);
                return Err(e);
            }
        };
        self.sector_stats
            .insert(criteria.sector.clone(), stats.clone());

        let candidates = filter_candidates(stocks, criteria, &stats);
        let ranked = score_and_rank(&candidates, &stats);

        tracing::info!(
            "Screened {} sector: {}/{} valid stocks qualified (mean P/E {:.2}, mean ROE {:.2})",
            criteria.sector,
            ranked.len(),
            stats.stock_count,
            stats.mean_pe,
            stats.mean_roe
        );

        self.cache.insert(key, ranked.clone(), now);
        Ok(ranked)
    }

    /// Baseline from the last fresh screen of `sector`
    pub fn sector_statistics(&self, sector: &str) -> Option<SectorStatistics> {
        self.sector_stats.get(sector).map(|s| s.clone())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop every cached result older than the TTL; returns how many went.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired(Utc::now())
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

impl Default for SectorScreener {
    fn default() -> Self {
        Self::new()
    }
}

impl Screener for SectorScreener {
    fn screen(
        &self,
        criteria: &ScreeningCriteria,
        stocks: &[StockRecord],
    ) -> Result<Vec<ScoredStock>, ScreeningError> {
        self.screen_stocks(criteria, stocks)
    }
}

/// Get top N ranked stocks
pub fn top_n(results: &[ScoredStock], n: usize) -> Vec<ScoredStock> {
    results.iter().take(n).cloned().collect()
}
