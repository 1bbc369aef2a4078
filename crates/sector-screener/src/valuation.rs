use screening_core::{positive, StockRecord, ValuationEstimate, ValuationRating};

const GRAHAM_MULTIPLIER: f64 = 22.5;
const DISCOUNT_RATE: f64 = 0.10;
const PERPETUAL_GROWTH: f64 = 0.03;
const MAX_GROWTH_RATE: f64 = 0.15;
const PROJECTION_YEARS: i32 = 5;

/// EPS approximated from book value per share and ROE
fn approximate_eps(stock: &StockRecord) -> Option<(f64, f64)> {
    let book_value = positive(stock.book_value)?;
    let roe = positive(stock.roe)?;
    Some((book_value * roe / 100.0, book_value))
}

/// sqrt(22.5 x EPS x book value); 0 when book value or ROE is not positive
pub fn graham_number(stock: &StockRecord) -> f64 {
    match approximate_eps(stock) {
        Some((eps, book_value)) => (GRAHAM_MULTIPLIER * eps * book_value).sqrt(),
        None => 0.0,
    }
}

/// DCF-lite: project EPS five years at a growth rate derived from ROE,
/// capitalize with a Gordon terminal value, and discount back.
pub fn intrinsic_value(stock: &StockRecord) -> f64 {
    let Some((eps, _)) = approximate_eps(stock) else {
        return 0.0;
    };
    let roe = stock.roe.unwrap_or(0.0);

    // Conservative: 60% of ROE, capped
    let growth_rate = (roe / 100.0 * 0.6).min(MAX_GROWTH_RATE);
    let future_eps = eps * (1.0 + growth_rate).powi(PROJECTION_YEARS);
    let terminal_value = future_eps * (1.0 + PERPETUAL_GROWTH) / (DISCOUNT_RATE - PERPETUAL_GROWTH);

    terminal_value / (1.0 + DISCOUNT_RATE).powi(PROJECTION_YEARS)
}

pub fn estimate_valuation(stock: &StockRecord) -> ValuationEstimate {
    let price = stock.price.unwrap_or(0.0);
    let graham = graham_number(stock);
    let intrinsic = intrinsic_value(stock);
    let pe = stock.positive_pe();
    let pb = stock.positive_price_to_book();

    let (rating, confidence_score) = if graham > 0.0 && price < graham * 0.8 {
        (ValuationRating::Undervalued, 80)
    } else if intrinsic > 0.0 && price < intrinsic * 0.9 {
        (ValuationRating::Undervalued, 70)
    } else if matches!((pe, pb), (Some(pe), Some(pb)) if pe < 15.0 && pb < 1.5) {
        (ValuationRating::Undervalued, 60)
    } else if matches!(pe, Some(pe) if pe > 25.0) || matches!(pb, Some(pb) if pb > 3.0) {
        (ValuationRating::Overvalued, 65)
    } else {
        (ValuationRating::FairValue, 50)
    };

    ValuationEstimate {
        intrinsic_value: intrinsic,
        graham_number: graham,
        rating,
        confidence_score,
    }
}
