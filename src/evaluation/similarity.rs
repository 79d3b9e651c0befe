use crate::config::constant::RANGE_EPSILON;
use crate::utils::{eq_ignore_case, min_max, spread};

/// Closeness of each price to `budget`, scaled by the pool's price spread and clipped to [0, 1].
pub fn price_similarity(prices: &[f64], budget: f64) -> Vec<f64> {
    let Some((min_p, max_p)) = min_max(prices) else {
        return vec![];
    };
    let denom = spread(min_p, max_p);
    prices
        .iter()
        .map(|p| (1.0 - (p - budget).abs() / denom).clamp(0.0, 1.0))
        .collect()
}

/// Min-max normalised rating. Not clipped; a flat pool maps to 0.
pub fn rating_similarity(ratings: &[f64]) -> Vec<f64> {
    let Some((min_r, max_r)) = min_max(ratings) else {
        return vec![];
    };
    ratings
        .iter()
        .map(|r| (r - min_r) / (max_r - min_r + RANGE_EPSILON))
        .collect()
}

/// 1.0 on a case-insensitive match; every row gets 1.0 when nothing is wanted.
pub fn match_similarity(values: &[&str], wanted: Option<&str>) -> Vec<f64> {
    match wanted {
        Some(w) => values
            .iter()
            .map(|v| if eq_ignore_case(v, w) { 1.0 } else { 0.0 })
            .collect(),
        None => vec![1.0; values.len()],
    }
}

/// Category only discriminates when the hard filter was not applied.
pub fn category_similarity(categories: &[&str], requested: Option<&str>, strict: bool) -> Vec<f64> {
    if strict {
        vec![1.0; categories.len()]
    } else {
        match_similarity(categories, requested)
    }
}

/// Closer is better. Rows without a distance score 0 when any other row has
/// one; with no distances at all every row is neutral.
pub fn distance_similarity(distances: &[Option<f64>]) -> Vec<f64> {
    let known: Vec<f64> = distances.iter().flatten().copied().collect();
    let Some((min_d, max_d)) = min_max(&known) else {
        return vec![1.0; distances.len()];
    };
    let denom = spread(min_d, max_d);
    distances
        .iter()
        .map(|d| match d {
            Some(d) => 1.0 - (d - min_d) / denom,
            None => 0.0,
        })
        .collect()
}
