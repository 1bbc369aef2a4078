use screening_core::stats::mean_where;
use screening_core::{ScreeningError, SectorStatistics, StockRecord};

/// Build the sector baseline from the valid stocks of `sector`.
///
/// Valuation ratio means only count positive values; ROE, debt-to-equity
/// and revenue growth count any defined value (growth may be negative).
/// A metric nobody reports averages to 0. Only a sector without a single
/// valid stock is an error.
pub fn calculate_sector_statistics(
    stocks: &[StockRecord],
    sector: &str,
) -> Result<SectorStatistics, ScreeningError> {
    let sector_stocks: Vec<&StockRecord> = stocks
        .iter()
        .filter(|s| s.sector == sector && s.is_valid())
        .collect();

    if sector_stocks.is_empty() {
        return Err(ScreeningError::EmptySector {
            sector: sector.to_string(),
        });
    }

    let positive = |v: f64| v > 0.0;
    let defined = |_: f64| true;

    Ok(SectorStatistics {
        sector: sector.to_string(),
        stock_count: sector_stocks.len(),
        mean_pe: mean_where(&sector_stocks, |s| s.pe_ratio, positive),
        mean_roe: mean_where(&sector_stocks, |s| s.roe, defined),
        mean_debt_to_equity: mean_where(&sector_stocks, |s| s.debt_to_equity, defined),
        mean_price_to_book: mean_where(&sector_stocks, |s| s.price_to_book, positive),
        mean_price_to_sales: mean_where(&sector_stocks, |s| s.price_to_sales, positive),
        mean_revenue_growth: mean_where(&sector_stocks, |s| s.revenue_growth, defined),
    })
}
