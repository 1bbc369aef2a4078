use crate::{ScoredStock, ScreeningCriteria, ScreeningError, StockRecord};

/// Trait for sector-relative screening engines
pub trait Screener: Send + Sync {
    /// Rank the stocks of `criteria.sector` that pass every gate, best first.
    fn screen(
        &self,
        criteria: &ScreeningCriteria,
        stocks: &[StockRecord],
    ) -> Result<Vec<ScoredStock>, ScreeningError>;
}
