//! Numeric helpers shared by the statistics and scoring stages.

/// Compute the unweighted mean of a data slice. An empty slice yields 0.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Mean of the values an accessor yields, skipping `None`s and anything
/// the `keep` predicate rejects.
pub fn mean_where<T>(
    items: &[&T],
    accessor: impl Fn(&T) -> Option<f64>,
    keep: impl Fn(f64) -> bool,
) -> f64 {
    let values: Vec<f64> = items
        .iter()
        .filter_map(|item| accessor(*item))
        .filter(|v| v.is_finite() && keep(*v))
        .collect();
    mean(&values)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
