use itertools::{Itertools, MinMaxResult};

use crate::config::constant::RANGE_EPSILON;

/// Case-insensitive equality on the full Unicode lowercase form.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Smallest and largest value, or `None` for an empty input.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    match values.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

/// Denominator used to normalise over `[min, max]`. A collapsed range falls
/// back to `max + RANGE_EPSILON`, so it is never exactly zero unless max is
/// `-RANGE_EPSILON`.
pub fn spread(min: f64, max: f64) -> f64 {
    let range = max - min;
    if range > 0.0 {
        range
    } else {
        max + RANGE_EPSILON
    }
}

/// Median; the two middle values are averaged for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted: Vec<f64> = values.iter().copied().sorted_by(|a, b| a.total_cmp(b)).collect();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
