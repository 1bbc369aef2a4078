use serde::{Deserialize, Serialize};

use crate::ScreeningError;

/// Per-stock fundamentals as supplied by the calling layer.
///
/// Every metric is optional: a missing field means "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockRecord {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: String,
    pub price: Option<f64>,

    // Valuation ratios (zero or negative means "not applicable")
    pub pe_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,

    // Profitability / health
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub free_cash_flow_margin: Option<f64>,
    pub net_income: Option<f64>,
    pub current_ratio: Option<f64>,
    pub operating_margin: Option<f64>,
    pub asset_turnover: Option<f64>,

    // Growth, in percent
    pub revenue_growth: Option<f64>,
    pub net_income_growth: Option<f64>,

    /// Book value per share
    pub book_value: Option<f64>,
}

impl StockRecord {
    pub fn new(symbol: impl Into<String>, sector: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            sector: sector.into(),
            price: Some(price),
            ..Default::default()
        }
    }

    /// A record takes part in statistics and screening only when it has a
    /// symbol, a sector and a finite price above zero.
    pub fn is_valid(&self) -> bool {
        !self.symbol.trim().is_empty()
            && !self.sector.trim().is_empty()
            && matches!(self.price, Some(p) if p.is_finite() && p > 0.0)
    }

    pub fn positive_pe(&self) -> Option<f64> {
        positive(self.pe_ratio)
    }

    pub fn positive_price_to_book(&self) -> Option<f64> {
        positive(self.price_to_book)
    }

    pub fn positive_price_to_sales(&self) -> Option<f64> {
        positive(self.price_to_sales)
    }
}

/// Keep a ratio only when it is defined and strictly positive.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Screening configuration. Unset options fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    #[serde(default)]
    pub sector: String,
    #[serde(default = "default_max_pe_multiplier")]
    pub max_pe_multiplier: f64,
    #[serde(default = "default_max_pb_multiplier")]
    pub max_pb_multiplier: f64,
    #[serde(default = "default_max_ps_multiplier")]
    pub max_ps_multiplier: f64,
    #[serde(default = "default_max_debt_to_equity")]
    pub max_debt_to_equity: f64,
    #[serde(default = "default_min_roe")]
    pub min_roe: f64,
    #[serde(default = "default_min_free_cash_flow_margin")]
    pub min_free_cash_flow_margin: f64,
    #[serde(default)]
    pub min_revenue_growth: f64,
    #[serde(default)]
    pub min_net_income_growth: Option<f64>,
    #[serde(default)]
    pub require_positive_net_income: bool,
    /// Skip the cache read; the fresh result is still written back.
    #[serde(default)]
    pub force_refresh: bool,
}

fn default_max_pe_multiplier() -> f64 {
    0.85
}
fn default_max_pb_multiplier() -> f64 {
    0.90
}
fn default_max_ps_multiplier() -> f64 {
    0.90
}
fn default_max_debt_to_equity() -> f64 {
    1.5
}
fn default_min_roe() -> f64 {
    10.0
}
fn default_min_free_cash_flow_margin() -> f64 {
    5.0
}

impl ScreeningCriteria {
    pub fn new(sector: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            max_pe_multiplier: default_max_pe_multiplier(),
            max_pb_multiplier: default_max_pb_multiplier(),
            max_ps_multiplier: default_max_ps_multiplier(),
            max_debt_to_equity: default_max_debt_to_equity(),
            min_roe: default_min_roe(),
            min_free_cash_flow_margin: default_min_free_cash_flow_margin(),
            min_revenue_growth: 0.0,
            min_net_income_growth: None,
            require_positive_net_income: false,
            force_refresh: false,
        }
    }

    pub fn validate(&self) -> Result<(), ScreeningError> {
        if self.sector.trim().is_empty() {
            return Err(ScreeningError::InvalidCriteria(
                "sector is required".to_string(),
            ));
        }

        let thresholds = [
            ("max_pe_multiplier", self.max_pe_multiplier),
            ("max_pb_multiplier", self.max_pb_multiplier),
            ("max_ps_multiplier", self.max_ps_multiplier),
            ("max_debt_to_equity", self.max_debt_to_equity),
            ("min_roe", self.min_roe),
            ("min_free_cash_flow_margin", self.min_free_cash_flow_margin),
            ("min_revenue_growth", self.min_revenue_growth),
            (
                "min_net_income_growth",
                self.min_net_income_growth.unwrap_or(0.0),
            ),
        ];
        if let Some((name, _)) = thresholds.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScreeningError::InvalidCriteria(format!(
                "{} must be a finite number",
                name
            )));
        }

        Ok(())
    }
}

/// A partial criteria set: sector presets and caller overrides.
/// Fields left as `None` keep whatever the base criteria already hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaOverrides {
    pub max_pe_multiplier: Option<f64>,
    pub max_pb_multiplier: Option<f64>,
    pub max_ps_multiplier: Option<f64>,
    pub max_debt_to_equity: Option<f64>,
    pub min_roe: Option<f64>,
    pub min_free_cash_flow_margin: Option<f64>,
    pub min_revenue_growth: Option<f64>,
    pub min_net_income_growth: Option<f64>,
    pub require_positive_net_income: Option<bool>,
    pub force_refresh: Option<bool>,
}

impl CriteriaOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: CriteriaOverrides) -> CriteriaOverrides {
        CriteriaOverrides {
            max_pe_multiplier: other.max_pe_multiplier.or(self.max_pe_multiplier),
            max_pb_multiplier: other.max_pb_multiplier.or(self.max_pb_multiplier),
            max_ps_multiplier: other.max_ps_multiplier.or(self.max_ps_multiplier),
            max_debt_to_equity: other.max_debt_to_equity.or(self.max_debt_to_equity),
            min_roe: other.min_roe.or(self.min_roe),
            min_free_cash_flow_margin: other
                .min_free_cash_flow_margin
                .or(self.min_free_cash_flow_margin),
            min_revenue_growth: other.min_revenue_growth.or(self.min_revenue_growth),
            min_net_income_growth: other.min_net_income_growth.or(self.min_net_income_growth),
            require_positive_net_income: other
                .require_positive_net_income
                .or(self.require_positive_net_income),
            force_refresh: other.force_refresh.or(self.force_refresh),
        }
    }

    pub fn apply(&self, mut criteria: ScreeningCriteria) -> ScreeningCriteria {
        if let Some(v) = self.max_pe_multiplier {
            criteria.max_pe_multiplier = v;
        }
        if let Some(v) = self.max_pb_multiplier {
            criteria.max_pb_multiplier = v;
        }
        if let Some(v) = self.max_ps_multiplier {
            criteria.max_ps_multiplier = v;
        }
        if let Some(v) = self.max_debt_to_equity {
            criteria.max_debt_to_equity = v;
        }
        if let Some(v) = self.min_roe {
            criteria.min_roe = v;
        }
        if let Some(v) = self.min_free_cash_flow_margin {
            criteria.min_free_cash_flow_margin = v;
        }
        if let Some(v) = self.min_revenue_growth {
            criteria.min_revenue_growth = v;
        }
        if self.min_net_income_growth.is_some() {
            criteria.min_net_income_growth = self.min_net_income_growth;
        }
        if let Some(v) = self.require_positive_net_income {
            criteria.require_positive_net_income = v;
        }
        if let Some(v) = self.force_refresh {
            criteria.force_refresh = v;
        }
        criteria
    }
}

/// Sector baseline: means over the valid stocks of one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorStatistics {
    pub sector: String,
    pub stock_count: usize,
    pub mean_pe: f64,
    pub mean_roe: f64,
    pub mean_debt_to_equity: f64,
    pub mean_price_to_book: f64,
    pub mean_price_to_sales: f64,
    pub mean_revenue_growth: f64,
}

/// Descriptive warning attached to a scored stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedFlag {
    #[serde(rename = "Penny stock")]
    PennyStock,
    #[serde(rename = "Excessive debt")]
    ExcessiveDebt,
    #[serde(rename = "Unprofitable")]
    Unprofitable,
    #[serde(rename = "Declining revenue")]
    DecliningRevenue,
    #[serde(rename = "Very high P/E")]
    VeryHighPe,
}

impl RedFlag {
    pub fn label(&self) -> &'static str {
        match self {
            RedFlag::PennyStock => "Penny stock",
            RedFlag::ExcessiveDebt => "Excessive debt",
            RedFlag::Unprofitable => "Unprofitable",
            RedFlag::DecliningRevenue => "Declining revenue",
            RedFlag::VeryHighPe => "Very high P/E",
        }
    }
}

impl std::fmt::Display for RedFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The four clamped sub-scores (0-10 each) behind a composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBreakdown {
    pub valuation: f64,
    pub health: f64,
    pub growth: f64,
    pub management: f64,
    pub red_flags: Vec<RedFlag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationRating {
    Undervalued,
    FairValue,
    Overvalued,
}

impl ValuationRating {
    pub fn to_label(&self) -> &'static str {
        match self {
            ValuationRating::Undervalued => "Undervalued",
            ValuationRating::FairValue => "Fair Value",
            ValuationRating::Overvalued => "Overvalued",
        }
    }
}

/// Heuristic per-share value estimate, for display alongside the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub intrinsic_value: f64,
    pub graham_number: f64,
    pub rating: ValuationRating,
    /// 0 to 100
    pub confidence_score: u8,
}

/// A stock that passed every gate, with its composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredStock {
    #[serde(flatten)]
    pub stock: StockRecord,
    /// Weighted composite in [0, 10], rounded to 2 decimals
    pub screening_score: f64,
    pub scoring_breakdown: ScoringBreakdown,
    pub valuation_estimate: ValuationEstimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_validity() {
        assert!(StockRecord::new("AAPL", "Technology", 175.5).is_valid());
        assert!(!StockRecord::new("", "Technology", 175.5).is_valid());
        assert!(!StockRecord::new("AAPL", " ", 175.5).is_valid());
        assert!(!StockRecord::new("AAPL", "Technology", 0.0).is_valid());
        assert!(!StockRecord::new("AAPL", "Technology", f64::NAN).is_valid());

        let no_price = StockRecord {
            price: None,
            ..StockRecord::new("AAPL", "Technology", 1.0)
        };
        assert!(!no_price.is_valid());
    }

    #[test]
    fn test_positive_ratios() {
        let stock = StockRecord {
            pe_ratio: Some(0.0),
            price_to_book: Some(-2.0),
            price_to_sales: Some(3.5),
            ..StockRecord::new("XOM", "Energy", 106.86)
        };
        assert_eq!(stock.positive_pe(), None);
        assert_eq!(stock.positive_price_to_book(), None);
        assert_eq!(stock.positive_price_to_sales(), Some(3.5));
    }

    #[test]
    fn test_missing_fields_deserialize_as_unknown() {
        let stock: StockRecord =
            serde_json::from_str(r#"{"symbol": "XOM", "sector": "Energy", "price": 106.86}"#)
                .unwrap();
        assert!(stock.is_valid());
        assert_eq!(stock.roe, None);
        assert_eq!(stock.debt_to_equity, None);
    }

    #[test]
    fn test_criteria_defaults_from_json() {
        let criteria: ScreeningCriteria =
            serde_json::from_str(r#"{"sector": "Technology", "min_roe": 15}"#).unwrap();
        let expected = ScreeningCriteria {
            min_roe: 15.0,
            ..ScreeningCriteria::new("Technology")
        };
        assert_eq!(criteria, expected);
        assert_eq!(criteria.max_pe_multiplier, 0.85);
        assert_eq!(criteria.max_debt_to_equity, 1.5);
        assert_eq!(criteria.min_net_income_growth, None);
    }

    #[test]
    fn test_criteria_validation() {
        assert!(ScreeningCriteria::new("Technology").validate().is_ok());

        let err = ScreeningCriteria::new("  ").validate().unwrap_err();
        assert!(matches!(err, ScreeningError::InvalidCriteria(_)));

        let bad = ScreeningCriteria {
            min_roe: f64::NAN,
            ..ScreeningCriteria::new("Technology")
        };
        assert!(bad.validate().unwrap_err().to_string().contains("min_roe"));
    }

    #[test]
    fn test_overrides_merge_and_apply() {
        let preset = CriteriaOverrides {
            min_roe: Some(15.0),
            max_pe_multiplier: Some(0.8),
            ..Default::default()
        };
        let caller = CriteriaOverrides {
            min_roe: Some(12.0),
            require_positive_net_income: Some(true),
            ..Default::default()
        };

        let criteria = preset
            .merge(caller)
            .apply(ScreeningCriteria::new("Technology"));
        assert_eq!(criteria.min_roe, 12.0);
        assert_eq!(criteria.max_pe_multiplier, 0.8);
        assert!(criteria.require_positive_net_income);
        assert_eq!(criteria.max_pb_multiplier, 0.90);
    }

    #[test]
    fn test_red_flag_serializes_as_label() {
        let json = serde_json::to_string(&vec![RedFlag::PennyStock, RedFlag::VeryHighPe]).unwrap();
        assert_eq!(json, r#"["Penny stock","Very high P/E"]"#);
        assert_eq!(RedFlag::ExcessiveDebt.to_string(), "Excessive debt");
    }
}
