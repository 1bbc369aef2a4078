//! Composite scoring model.
//!
//! Four sub-scores on a 0-10 scale, each clamped before weighting:
//! valuation (cheapness versus the sector), financial health, growth, and
//! management efficiency. The composite is their weighted sum.

use screening_core::stats::round_to;
use screening_core::{RedFlag, ScoredStock, ScoringBreakdown, SectorStatistics, StockRecord};

use crate::valuation::estimate_valuation;

/// Fixed factor weights; they sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub valuation: f64,
    pub health: f64,
    pub growth: f64,
    pub management: f64,
}

pub const WEIGHTS: ScoringWeights = ScoringWeights {
    valuation: 0.40,
    health: 0.30,
    growth: 0.20,
    management: 0.10,
};

/// Cheapness versus the sector, starting from a neutral 5.
/// P/E moves the score by up to 3 points per unit of relative discount,
/// P/B by up to 2.
pub fn valuation_score(stock: &StockRecord, stats: &SectorStatistics) -> f64 {
    let mut score: f64 = 5.0;

    if let Some(pe) = stock.positive_pe() {
        if stats.mean_pe > 0.0 {
            score += (1.0 - pe / stats.mean_pe) * 3.0;
        }
    }

    if let Some(pb) = stock.positive_price_to_book() {
        if stats.mean_price_to_book > 0.0 {
            score += (1.0 - pb / stats.mean_price_to_book) * 2.0;
        }
    }

    score.clamp(0.0, 10.0)
}

/// Additive from zero: health has to be earned.
pub fn health_score(stock: &StockRecord) -> f64 {
    let mut score: f64 = 0.0;

    score += match stock.roe {
        Some(roe) if roe >= 15.0 => 3.0,
        Some(roe) if roe >= 10.0 => 2.0,
        Some(roe) if roe >= 5.0 => 1.0,
        _ => 0.0,
    };

    score += match stock.debt_to_equity {
        Some(de) if de < 0.5 => 2.0,
        Some(de) if de < 1.0 => 1.5,
        Some(de) if de < 1.5 => 1.0,
        _ => 0.0,
    };

    score += match stock.free_cash_flow_margin {
        Some(m) if m >= 15.0 => 2.0,
        Some(m) if m >= 10.0 => 1.5,
        Some(m) if m >= 5.0 => 1.0,
        _ => 0.0,
    };

    if matches!(stock.net_income, Some(ni) if ni > 0.0) {
        score += 1.0;
    }

    score += match stock.current_ratio {
        Some(cr) if cr >= 2.0 => 1.0,
        Some(cr) if cr >= 1.5 => 0.5,
        _ => 0.0,
    };

    score.clamp(0.0, 10.0)
}

/// Neutral 5, plus growth buckets. Growth that is unreported counts as
/// unproven and takes the same point off as a decline.
pub fn growth_score(stock: &StockRecord, stats: &SectorStatistics) -> f64 {
    let mut score: f64 = 5.0;

    score += match stock.revenue_growth {
        Some(g) if g >= 20.0 => 2.0,
        Some(g) if g >= 10.0 => 1.5,
        Some(g) if g >= 5.0 => 1.0,
        Some(g) if g >= 0.0 => 0.5,
        _ => -1.0,
    };

    score += match stock.net_income_growth {
        Some(g) if g >= 20.0 => 2.0,
        Some(g) if g >= 10.0 => 1.0,
        Some(g) if g >= 0.0 => 0.5,
        _ => -1.0,
    };

    if matches!(stock.revenue_growth, Some(g) if g > stats.mean_revenue_growth) {
        score += 1.0;
    }

    score.clamp(0.0, 10.0)
}

/// Neutral 5; ROE against the sector is the main management proxy.
pub fn management_score(stock: &StockRecord, stats: &SectorStatistics) -> f64 {
    let mut score: f64 = 5.0;

    score += match stock.roe {
        Some(roe) if roe > stats.mean_roe * 1.2 => 2.0,
        Some(roe) if roe > stats.mean_roe => 1.0,
        _ => 0.0,
    };

    if matches!(stock.asset_turnover, Some(t) if t > 1.0) {
        score += 1.0;
    }

    score += match stock.operating_margin {
        Some(m) if m >= 20.0 => 1.0,
        Some(m) if m >= 15.0 => 0.5,
        _ => 0.0,
    };

    score.clamp(0.0, 10.0)
}

/// Descriptive warnings for display. This is not a gate.
pub fn identify_red_flags(stock: &StockRecord) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    if matches!(stock.price, Some(p) if p < 5.0) {
        flags.push(RedFlag::PennyStock);
    }
    if matches!(stock.debt_to_equity, Some(de) if de > 3.0) {
        flags.push(RedFlag::ExcessiveDebt);
    }
    if matches!(stock.net_income, Some(ni) if ni < 0.0) {
        flags.push(RedFlag::Unprofitable);
    }
    if matches!(stock.revenue_growth, Some(g) if g < -10.0) {
        flags.push(RedFlag::DecliningRevenue);
    }
    if matches!(stock.positive_pe(), Some(pe) if pe > 50.0) {
        flags.push(RedFlag::VeryHighPe);
    }

    flags
}

pub fn score_breakdown(stock: &StockRecord, stats: &SectorStatistics) -> ScoringBreakdown {
    ScoringBreakdown {
        valuation: valuation_score(stock, stats),
        health: health_score(stock),
        growth: growth_score(stock, stats),
        management: management_score(stock, stats),
        red_flags: identify_red_flags(stock),
    }
}

/// Weighted sum of the sub-scores, rounded to 2 decimals.
pub fn composite_score(breakdown: &ScoringBreakdown) -> f64 {
    let composite = breakdown.valuation * WEIGHTS.valuation
        + breakdown.health * WEIGHTS.health
        + breakdown.growth * WEIGHTS.growth
        + breakdown.management * WEIGHTS.management;
    round_to(composite, 2)
}

pub fn score_stock(stock: &StockRecord, stats: &SectorStatistics) -> ScoredStock {
    let breakdown = score_breakdown(stock, stats);
    ScoredStock {
        stock: stock.clone(),
        screening_score: composite_score(&breakdown),
        scoring_breakdown: breakdown,
        valuation_estimate: estimate_valuation(stock),
    }
}

/// Score every candidate and sort best first. The sort is stable, so
/// equal scores keep their input order.
pub fn score_and_rank(candidates: &[&StockRecord], stats: &SectorStatistics) -> Vec<ScoredStock> {
    let mut scored: Vec<ScoredStock> = candidates
        .iter()
        .map(|stock| score_stock(stock, stats))
        .collect();

    scored.sort_by(|a, b| b.screening_score.total_cmp(&a.screening_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats() -> SectorStatistics {
        SectorStatistics {
            sector: "Technology".to_string(),
            stock_count: 3,
            mean_pe: 20.0,
            mean_roe: 15.0,
            mean_debt_to_equity: 1.0,
            mean_price_to_book: 0.0,
            mean_price_to_sales: 0.0,
            mean_revenue_growth: 5.0,
        }
    }

    fn candidate() -> StockRecord {
        StockRecord {
            pe_ratio: Some(15.0),
            roe: Some(26.0),
            debt_to_equity: Some(1.0),
            free_cash_flow_margin: Some(20.0),
            revenue_growth: Some(10.0),
            net_income_growth: Some(12.0),
            net_income: Some(94_680_000_000.0),
            ..StockRecord::new("CAND", "Technology", 175.0)
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total = WEIGHTS.valuation + WEIGHTS.health + WEIGHTS.growth + WEIGHTS.management;
        assert_relative_eq!(total, 1.0);
    }

    #[test]
    fn test_valuation_rewards_discount_to_sector() {
        let stats = stats();
        // 15 / 20 = 0.75 -> +0.75
        assert_relative_eq!(valuation_score(&candidate(), &stats), 5.75);

        let pricey = StockRecord {
            pe_ratio: Some(30.0),
            ..candidate()
        };
        assert_relative_eq!(valuation_score(&pricey, &stats), 3.5);

        let unknown = StockRecord {
            pe_ratio: None,
            ..candidate()
        };
        assert_relative_eq!(valuation_score(&unknown, &stats), 5.0);
    }

    #[test]
    fn test_valuation_includes_price_to_book() {
        let stats = SectorStatistics {
            mean_price_to_book: 4.0,
            ..stats()
        };
        let stock = StockRecord {
            pe_ratio: Some(20.0),
            price_to_book: Some(2.0),
            ..candidate()
        };
        assert_relative_eq!(valuation_score(&stock, &stats), 6.0);
    }

    #[test]
    fn test_valuation_is_clamped() {
        let stock = StockRecord {
            pe_ratio: Some(200.0),
            ..candidate()
        };
        assert_eq!(valuation_score(&stock, &stats()), 0.0);
    }

    #[test]
    fn test_health_buckets() {
        // ROE 26 -> 3, D/E 1.0 -> 1, FCF 20 -> 2, profitable -> 1
        assert_relative_eq!(health_score(&candidate()), 7.0);

        let strong = StockRecord {
            debt_to_equity: Some(0.3),
            current_ratio: Some(2.5),
            ..candidate()
        };
        assert_relative_eq!(health_score(&strong), 9.0);

        let middling = StockRecord {
            roe: Some(7.0),
            debt_to_equity: Some(0.9),
            free_cash_flow_margin: Some(11.0),
            net_income: Some(-1.0),
            current_ratio: Some(1.6),
            ..candidate()
        };
        assert_relative_eq!(health_score(&middling), 4.5);

        assert_eq!(health_score(&StockRecord::new("NONE", "Technology", 10.0)), 0.0);
    }

    #[test]
    fn test_growth_buckets() {
        // revenue 10 -> 1.5, net income 12 -> 1, above sector mean -> 1
        assert_relative_eq!(growth_score(&candidate(), &stats()), 8.5);

        let declining = StockRecord {
            revenue_growth: Some(-3.0),
            net_income_growth: Some(-8.0),
            ..candidate()
        };
        assert_relative_eq!(growth_score(&declining, &stats()), 3.0);

        let unreported = StockRecord {
            revenue_growth: Some(2.0),
            net_income_growth: None,
            ..candidate()
        };
        assert_relative_eq!(growth_score(&unreported, &stats()), 4.5);
    }

    #[test]
    fn test_management_score() {
        assert_relative_eq!(management_score(&candidate(), &stats()), 7.0);

        let efficient = StockRecord {
            roe: Some(16.0),
            asset_turnover: Some(1.2),
            operating_margin: Some(17.0),
            ..candidate()
        };
        assert_relative_eq!(management_score(&efficient, &stats()), 7.5);

        let laggard = StockRecord {
            roe: Some(12.0),
            asset_turnover: Some(0.8),
            operating_margin: Some(25.0),
            ..candidate()
        };
        assert_relative_eq!(management_score(&laggard, &stats()), 6.0);
    }

    #[test]
    fn test_sub_scores_stay_in_range() {
        let best = StockRecord {
            pe_ratio: Some(0.5),
            roe: Some(80.0),
            debt_to_equity: Some(0.1),
            current_ratio: Some(3.0),
            revenue_growth: Some(50.0),
            net_income_growth: Some(50.0),
            asset_turnover: Some(2.0),
            operating_margin: Some(40.0),
            ..candidate()
        };
        let worst = StockRecord::new("NONE", "Technology", 10.0);
        let stats = stats();

        for stock in [&best, &worst] {
            let scores = [
                valuation_score(stock, &stats),
                health_score(stock),
                growth_score(stock, &stats),
                management_score(stock, &stats),
            ];
            for score in scores {
                assert!((0.0..=10.0).contains(&score), "{} out of range", score);
            }
        }
        assert_relative_eq!(health_score(&best), 9.0);
        assert_relative_eq!(growth_score(&best, &stats), 10.0);
        assert_relative_eq!(growth_score(&worst, &stats), 3.0);
    }

    #[test]
    fn test_red_flag_labels() {
        let stock = StockRecord {
            debt_to_equity: Some(3.5),
            net_income: Some(-10.0),
            revenue_growth: Some(-15.0),
            pe_ratio: Some(55.0),
            ..StockRecord::new("RISK", "Technology", 4.5)
        };
        assert_eq!(
            identify_red_flags(&stock),
            vec![
                RedFlag::PennyStock,
                RedFlag::ExcessiveDebt,
                RedFlag::Unprofitable,
                RedFlag::DecliningRevenue,
                RedFlag::VeryHighPe,
            ]
        );
        assert!(identify_red_flags(&candidate()).is_empty());
    }

    #[test]
    fn test_composite_score() {
        let scored = score_stock(&candidate(), &stats());
        // 5.75*0.4 + 7*0.3 + 8.5*0.2 + 7*0.1
        assert_relative_eq!(scored.screening_score, 6.8);
        assert!(scored.scoring_breakdown.valuation > 5.0);
        assert_eq!(scored.stock, candidate());
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let stats = stats();
        let cheap = StockRecord {
            symbol: "CHEAP".to_string(),
            pe_ratio: Some(10.0),
            ..candidate()
        };
        let twin_a = StockRecord {
            symbol: "TWIN_A".to_string(),
            ..candidate()
        };
        let twin_b = StockRecord {
            symbol: "TWIN_B".to_string(),
            ..candidate()
        };

        let ranked = score_and_rank(&[&twin_a, &cheap, &twin_b], &stats);
        let symbols: Vec<&str> = ranked.iter().map(|s| s.stock.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["CHEAP", "TWIN_A", "TWIN_B"]);
        assert!(ranked[0].screening_score > ranked[1].screening_score);
        assert_eq!(ranked[1].screening_score, ranked[2].screening_score);
    }
}
