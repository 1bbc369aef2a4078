//! Conjunctive filter pipeline.
//!
//! A stock qualifies only if it clears every gate, in order: validity and
//! sector match, valuation versus the sector baseline, financial health,
//! growth, and the absolute red-flag disqualifiers.

use screening_core::{ScreeningCriteria, SectorStatistics, StockRecord};
use std::collections::BTreeMap;

/// Penny-stock cutoff for the red-flag gate
pub const MIN_PRICE: f64 = 5.0;
pub const MAX_DEBT_TO_EQUITY_RED_FLAG: f64 = 3.0;
pub const MAX_NET_INCOME_DECLINE: f64 = -10.0;
pub const MAX_REVENUE_DECLINE: f64 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationRatio {
    PriceToEarnings,
    PriceToBook,
    PriceToSales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    DebtToEquity,
    ReturnOnEquity,
    FreeCashFlowMargin,
    NetIncome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthCheck {
    RevenueGrowth,
    NetIncomeGrowth,
}

/// Absolute disqualifiers that no criteria can relax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disqualifier {
    PennyStock,
    ExcessiveDebt,
    PersistentLosses,
    SevereRevenueDecline,
}

/// First gate a stock failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Invalid,
    SectorMismatch,
    Valuation(ValuationRatio),
    Health(HealthCheck),
    Growth(GrowthCheck),
    RedFlag(Disqualifier),
}

impl Rejection {
    pub fn stage(&self) -> &'static str {
        match self {
            Rejection::Invalid => "invalid",
            Rejection::SectorMismatch => "sector",
            Rejection::Valuation(_) => "valuation",
            Rejection::Health(_) => "health",
            Rejection::Growth(_) => "growth",
            Rejection::RedFlag(_) => "red_flag",
        }
    }
}

/// Run one stock through every gate.
pub fn evaluate(
    stock: &StockRecord,
    criteria: &ScreeningCriteria,
    stats: &SectorStatistics,
) -> Result<(), Rejection> {
    if !stock.is_valid() {
        return Err(Rejection::Invalid);
    }
    if stock.sector != criteria.sector {
        return Err(Rejection::SectorMismatch);
    }
    check_valuation(stock, criteria, stats).map_err(Rejection::Valuation)?;
    check_health(stock, criteria).map_err(Rejection::Health)?;
    check_growth(stock, criteria).map_err(Rejection::Growth)?;
    check_red_flags(stock).map_err(Rejection::RedFlag)?;
    Ok(())
}

/// Keep the stocks that pass every gate, preserving input order.
pub fn filter_candidates<'a>(
    stocks: &'a [StockRecord],
    criteria: &ScreeningCriteria,
    stats: &SectorStatistics,
) -> Vec<&'a StockRecord> {
    let mut rejected: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut passed = Vec::new();

    for stock in stocks {
        match evaluate(stock, criteria, stats) {
            Ok(()) => passed.push(stock),
            Err(rejection) => *rejected.entry(rejection.stage()).or_default() += 1,
        }
    }

    tracing::debug!(
        "Filtered {} sector: {} passed, rejections by stage: {:?}",
        criteria.sector,
        passed.len(),
        rejected
    );

    passed
}

/// A ratio is only held against its ceiling when it is defined and positive;
/// an unknown ratio is no evidence against the stock. The ceiling itself is
/// inclusive.
fn check_valuation(
    stock: &StockRecord,
    criteria: &ScreeningCriteria,
    stats: &SectorStatistics,
) -> Result<(), ValuationRatio> {
    let checks = [
        (
            stock.positive_pe(),
            stats.mean_pe * criteria.max_pe_multiplier,
            ValuationRatio::PriceToEarnings,
        ),
        (
            stock.positive_price_to_book(),
            stats.mean_price_to_book * criteria.max_pb_multiplier,
            ValuationRatio::PriceToBook,
        ),
        (
            stock.positive_price_to_sales(),
            stats.mean_price_to_sales * criteria.max_ps_multiplier,
            ValuationRatio::PriceToSales,
        ),
    ];

    for (ratio, threshold, kind) in checks {
        if matches!(ratio, Some(r) if r > threshold) {
            return Err(kind);
        }
    }
    Ok(())
}

/// Thresholds compared against a caller floor or ceiling need the metric to
/// be reported; a missing value fails.
fn check_health(stock: &StockRecord, criteria: &ScreeningCriteria) -> Result<(), HealthCheck> {
    if !matches!(stock.debt_to_equity, Some(de) if de <= criteria.max_debt_to_equity) {
        return Err(HealthCheck::DebtToEquity);
    }
    if !matches!(stock.roe, Some(roe) if roe >= criteria.min_roe) {
        return Err(HealthCheck::ReturnOnEquity);
    }
    if !matches!(stock.free_cash_flow_margin, Some(m) if m >= criteria.min_free_cash_flow_margin) {
        return Err(HealthCheck::FreeCashFlowMargin);
    }
    if criteria.require_positive_net_income && !matches!(stock.net_income, Some(ni) if ni > 0.0) {
        return Err(HealthCheck::NetIncome);
    }
    Ok(())
}

fn check_growth(stock: &StockRecord, criteria: &ScreeningCriteria) -> Result<(), GrowthCheck> {
    if !matches!(stock.revenue_growth, Some(g) if g >= criteria.min_revenue_growth) {
        return Err(GrowthCheck::RevenueGrowth);
    }
    if let Some(min) = criteria.min_net_income_growth {
        if !matches!(stock.net_income_growth, Some(g) if g >= min) {
            return Err(GrowthCheck::NetIncomeGrowth);
        }
    }
    Ok(())
}

/// Red flags need positive evidence: a missing metric raises nothing.
fn check_red_flags(stock: &StockRecord) -> Result<(), Disqualifier> {
    if matches!(stock.price, Some(p) if p < MIN_PRICE) {
        return Err(Disqualifier::PennyStock);
    }
    if matches!(stock.debt_to_equity, Some(de) if de > MAX_DEBT_TO_EQUITY_RED_FLAG) {
        return Err(Disqualifier::ExcessiveDebt);
    }
    if let (Some(ni), Some(growth)) = (stock.net_income, stock.net_income_growth) {
        if ni < 0.0 && growth < MAX_NET_INCOME_DECLINE {
            return Err(Disqualifier::PersistentLosses);
        }
    }
    if matches!(stock.revenue_growth, Some(g) if g < MAX_REVENUE_DECLINE) {
        return Err(Disqualifier::SevereRevenueDecline);
    }
    Ok(())
}
