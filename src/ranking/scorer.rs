use tracing::{debug, info, span, trace, warn, Level};

use crate::config::column;
use crate::distance::{haversine_km, CoordinateTable};
use crate::domain::types::{
    RankedResult, RankedVendor, Similarity, UserPreferences, VendorRecord, VendorTable,
};
use crate::domain::weights::WeightSet;
use crate::error::{Error, Result};
use crate::evaluation::{
    category_similarity, distance_similarity, explain, match_similarity, price_similarity,
    rating_similarity,
};
use crate::utils::{eq_ignore_case, median};

/// Ranks vendor offers against a user's preferences.
///
/// The scorer owns the municipality coordinate index it resolves the user's
/// location against, plus the criterion weights and the category filter mode.
/// It holds no mutable state, so one instance can serve any number of callers.
#[derive(Debug, Clone)]
pub struct VendorScorer {
    coords: CoordinateTable,
    weights: WeightSet,
    strict_service: bool,
}

impl VendorScorer {
    pub fn new(coords: CoordinateTable) -> Self {
        VendorScorer {
            coords,
            weights: WeightSet::default(),
            strict_service: true,
        }
    }

    pub fn with_weights(mut self, weights: WeightSet) -> Self {
        self.weights = weights;
        self
    }

    /// When strict, a requested category is a hard filter instead of a weighted criterion.
    pub fn with_strict_service(mut self, strict_service: bool) -> Self {
        self.strict_service = strict_service;
        self
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn strict_service(&self) -> bool {
        self.strict_service
    }

    /// Scores every candidate vendor and returns the best `top_n`, highest
    /// score first with ties going to the higher rating.
    ///
    /// Fails when the table lacks a required column or the user's
    /// municipality has no coordinates. An empty table or `top_n == 0`
    /// yields an empty result.
    pub fn recommend(
        &self,
        vendors: &VendorTable,
        prefs: &UserPreferences,
        top_n: usize,
    ) -> Result<RankedResult> {
        let span = span!(Level::INFO, "recommend", municipality = %prefs.municipality, top_n);
        let _guard = span.enter();

        vendors.validate_schema()?;
        check_finite(vendors, prefs)?;
        let user_coords = self.coords.lookup(&prefs.municipality)?;
        debug!("Resolved {} to {:?}", prefs.municipality, user_coords);

        let with_distance = vendors.has_coordinates();
        let columns = output_columns(vendors, with_distance);

        if vendors.is_empty() || top_n == 0 {
            info!("Nothing to rank ({} vendors, top_n = {})", vendors.len(), top_n);
            return Ok(RankedResult::empty(columns));
        }

        let distances: Vec<Option<f64>> = vendors
            .records
            .iter()
            .map(|r| {
                if with_distance {
                    r.coordinates().map(|c| haversine_km(user_coords, c))
                } else {
                    None
                }
            })
            .collect();

        let pool = candidate_pool(vendors, prefs.requested_category(), self.strict_service);
        debug!("Candidate pool: {} of {} vendors", pool.len(), vendors.len());

        let records: Vec<&VendorRecord> = pool.iter().map(|&i| &vendors.records[i]).collect();
        let pool_distances: Vec<Option<f64>> = pool.iter().map(|&i| distances[i]).collect();

        let prices: Vec<f64> = records.iter().map(|r| r.estimated_price).collect();
        let ratings: Vec<f64> = records.iter().map(|r| r.rating).collect();
        let packages: Vec<&str> = records.iter().map(|r| r.package.as_str()).collect();
        let municipalities: Vec<&str> = records.iter().map(|r| r.municipality.as_str()).collect();
        let categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();

        let budget = match prefs.budget {
            Some(b) => b,
            None => {
                let m = median(&prices).unwrap_or(0.0);
                debug!("No budget given, using pool median {:.2}", m);
                m
            }
        };
        let package = prefs.requested_package();
        let municipality = prefs.requested_municipality();

        let price_sim = price_similarity(&prices, budget);
        let rating_sim = rating_similarity(&ratings);
        let package_sim = match_similarity(&packages, package);
        let municipality_sim = match_similarity(&municipalities, municipality);
        let category_sim =
            category_similarity(&categories, prefs.requested_category(), self.strict_service);
        let distance_sim = distance_similarity(&pool_distances);

        let mut rows: Vec<RankedVendor> = records
            .iter()
            .enumerate()
            .map(|(k, record)| {
                let similarity = Similarity {
                    price: price_sim[k],
                    rating: rating_sim[k],
                    package: package_sim[k],
                    municipality: municipality_sim[k],
                    category: category_sim[k],
                    distance: distance_sim[k],
                };
                let score = self.weights.combine(&similarity);
                let explanation = explain(record, budget, package, municipality, pool_distances[k]);
                trace!("{}: score {:.4} ({})", record.vendor_name, score, explanation);
                RankedVendor {
                    record: (*record).clone(),
                    distance_km: pool_distances[k],
                    score,
                    explanation,
                    similarity,
                }
            })
            .collect();

        // Stable sort keeps input order for rows tied on both keys.
        rows.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.record.rating.total_cmp(&a.record.rating))
        });
        rows.truncate(top_n);

        info!("Ranked {} vendors, returning {}", pool.len(), rows.len());
        Ok(RankedResult { columns, rows })
    }
}

/// Indices of the rows under consideration. A strict category filter that
/// would leave nothing is dropped in favour of the whole table.
fn candidate_pool(vendors: &VendorTable, category: Option<&str>, strict: bool) -> Vec<usize> {
    let all = || (0..vendors.len()).collect::<Vec<usize>>();
    let Some(category) = category.filter(|_| strict) else {
        return all();
    };

    let matching: Vec<usize> = vendors
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| eq_ignore_case(&r.category, category))
        .map(|(i, _)| i)
        .collect();

    if matching.is_empty() {
        warn!(
            "No vendors offer category '{}', falling back to all {} vendors",
            category,
            vendors.len()
        );
        all()
    } else {
        matching
    }
}

/// NaN or infinite inputs would poison every min/max over the pool.
fn check_finite(vendors: &VendorTable, prefs: &UserPreferences) -> Result<()> {
    let invalid = |row: usize, column: &str, value: f64| Error::InvalidField {
        row,
        column: column.to_string(),
        value: value.to_string(),
    };

    if let Some(budget) = prefs.budget.filter(|b| !b.is_finite()) {
        return Err(invalid(0, "Budget", budget));
    }
    for (i, r) in vendors.records.iter().enumerate() {
        let cells = [
            (column::ESTIMATED_PRICE, Some(r.estimated_price)),
            (column::RATING, Some(r.rating)),
            (column::LATITUDE, r.latitude),
            (column::LONGITUDE, r.longitude),
        ];
        for (name, value) in cells {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(invalid(i + 1, name, v));
            }
        }
    }
    Ok(())
}

fn output_columns(vendors: &VendorTable, with_distance: bool) -> Vec<String> {
    let mut columns = vendors.columns.clone();
    if with_distance && !vendors.has_column(column::DISTANCE_KM) {
        columns.push(column::DISTANCE_KM.to_string());
    }
    columns.push(column::SCORE.to_string());
    columns.push(column::EXPLANATION.to_string());
    columns
}
