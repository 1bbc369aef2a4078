use screening_core::{CriteriaOverrides, ScreeningCriteria};

/// Sector-specific starting point for screening criteria
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPreset {
    pub overrides: CriteriaOverrides,
    /// Metrics that matter most when reading results for this sector
    pub focus_metrics: &'static [&'static str],
}

/// Look up the preset for a sector name (case-insensitive). Unknown
/// sectors get a general-purpose fallback.
pub fn sector_preset(sector: &str) -> SectorPreset {
    let name = sector.trim();

    if name.eq_ignore_ascii_case("Technology") {
        // More aggressive on valuation, demands growth
        SectorPreset {
            overrides: CriteriaOverrides {
                min_roe: Some(15.0),
                max_pe_multiplier: Some(0.8),
                min_revenue_growth: Some(10.0),
                ..Default::default()
            },
            focus_metrics: &["pe_ratio", "revenue_growth", "roe"],
        }
    } else if name.eq_ignore_ascii_case("Healthcare") {
        SectorPreset {
            overrides: CriteriaOverrides {
                min_roe: Some(12.0),
                max_pe_multiplier: Some(0.85),
                min_revenue_growth: Some(5.0),
                ..Default::default()
            },
            focus_metrics: &["pe_ratio", "roe", "debt_to_equity"],
        }
    } else if name.eq_ignore_ascii_case("Finance") {
        // Banks carry structurally higher leverage
        SectorPreset {
            overrides: CriteriaOverrides {
                min_roe: Some(10.0),
                max_debt_to_equity: Some(2.0),
                max_pb_multiplier: Some(0.9),
                ..Default::default()
            },
            focus_metrics: &["price_to_book", "roe", "net_income_growth"],
        }
    } else if name.eq_ignore_ascii_case("Utilities") {
        SectorPreset {
            overrides: CriteriaOverrides {
                min_roe: Some(8.0),
                max_pe_multiplier: Some(0.9),
                min_revenue_growth: Some(0.0),
                ..Default::default()
            },
            focus_metrics: &["dividend_yield", "debt_to_equity", "roe"],
        }
    } else {
        SectorPreset {
            overrides: CriteriaOverrides {
                min_roe: Some(10.0),
                max_pe_multiplier: Some(0.85),
                min_revenue_growth: Some(3.0),
                ..Default::default()
            },
            focus_metrics: &[],
        }
    }
}

/// Default criteria with the sector preset applied
pub fn criteria_for_sector(sector: &str) -> ScreeningCriteria {
    sector_preset(sector)
        .overrides
        .apply(ScreeningCriteria::new(sector))
}

/// Preset for `sector`, then caller overrides on top
pub fn criteria_with_overrides(sector: &str, overrides: CriteriaOverrides) -> ScreeningCriteria {
    sector_preset(sector)
        .overrides
        .merge(overrides)
        .apply(ScreeningCriteria::new(sector))
}
