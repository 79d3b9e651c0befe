use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::types::Similarity;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Price,
    Rating,
    Package,
    Municipality,
    Category,
    Distance,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Price,
        Criterion::Rating,
        Criterion::Package,
        Criterion::Municipality,
        Criterion::Category,
        Criterion::Distance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Price => "price",
            Criterion::Rating => "rating",
            Criterion::Package => "package",
            Criterion::Municipality => "municipality",
            Criterion::Category => "category",
            Criterion::Distance => "distance",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative weight per criterion. Weights are not normalised, so the
/// score is a plain weighted sum and may exceed 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Criterion, f64>", into = "BTreeMap<Criterion, f64>")]
pub struct WeightSet {
    weights: BTreeMap<Criterion, f64>,
}

impl Default for WeightSet {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Criterion::Price, 0.5),
            (Criterion::Rating, 0.20),
            (Criterion::Package, 0.15),
            (Criterion::Municipality, 0.15),
            (Criterion::Category, 0.10),
            (Criterion::Distance, 0.15),
        ]);
        WeightSet { weights }
    }
}

impl WeightSet {
    /// Empty set: every criterion weighs 0 until set.
    pub fn empty() -> Self {
        WeightSet {
            weights: BTreeMap::new(),
        }
    }

    pub fn with(mut self, criterion: Criterion, weight: f64) -> Result<Self> {
        let weight = check_weight(criterion, weight)?;
        self.weights.insert(criterion, weight);
        Ok(self)
    }

    /// Missing criteria weigh 0.
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.weights.get(&criterion).copied().unwrap_or(0.0)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let weights: BTreeMap<Criterion, f64> = serde_json::from_str(raw)?;
        WeightSet::try_from(weights)
    }

    pub fn combine(&self, sim: &Similarity) -> f64 {
        self.get(Criterion::Price) * sim.price
            + self.get(Criterion::Rating) * sim.rating
            + self.get(Criterion::Package) * sim.package
            + self.get(Criterion::Municipality) * sim.municipality
            + self.get(Criterion::Category) * sim.category
            + self.get(Criterion::Distance) * sim.distance
    }
}

/// Returns the weight with `-0.0` folded into `+0.0`, so zero scores compare equal.
fn check_weight(criterion: Criterion, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value + 0.0)
    } else {
        Err(Error::InvalidWeight { criterion, value })
    }
}

impl TryFrom<BTreeMap<Criterion, f64>> for WeightSet {
    type Error = Error;

    fn try_from(weights: BTreeMap<Criterion, f64>) -> Result<Self> {
        let weights = weights
            .into_iter()
            .map(|(criterion, value)| check_weight(criterion, value).map(|v| (criterion, v)))
            .collect::<Result<BTreeMap<Criterion, f64>>>()?;
        Ok(WeightSet { weights })
    }
}

impl From<WeightSet> for BTreeMap<Criterion, f64> {
    fn from(set: WeightSet) -> Self {
        set.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_criteria_weigh_zero() {
        let weights = WeightSet::empty().with(Criterion::Price, 1.0).unwrap();
        assert_eq!(weights.get(Criterion::Price), 1.0);
        assert_eq!(weights.get(Criterion::Distance), 0.0);
    }

    #[test]
    fn parses_partial_json() {
        let weights = WeightSet::from_json(r#"{"price": 0.4, "distance": 0.6}"#).unwrap();
        assert_eq!(weights.get(Criterion::Price), 0.4);
        assert_eq!(weights.get(Criterion::Distance), 0.6);
        assert_eq!(weights.get(Criterion::Rating), 0.0);
    }

    #[test]
    fn rejects_negative_weight() {
        let err = WeightSet::from_json(r#"{"rating": -1.0}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidWeight {
                criterion: Criterion::Rating,
                ..
            }
        ));
    }

    #[test]
    fn negative_zero_weight_becomes_positive_zero() {
        let weights = WeightSet::empty().with(Criterion::Price, -0.0).unwrap();
        assert!(weights.get(Criterion::Price).is_sign_positive());

        let weights = WeightSet::from_json(r#"{"rating": -0.0, "price": 1.0}"#).unwrap();
        assert!(weights.get(Criterion::Rating).is_sign_positive());

        let sim = Similarity {
            rating: 1.0,
            ..Default::default()
        };
        let score = weights.combine(&sim);
        assert_eq!(score.total_cmp(&0.0), std::cmp::Ordering::Equal);
    }

    #[test]
    fn rejects_unknown_criterion() {
        assert!(matches!(
            WeightSet::from_json(r#"{"vibes": 1.0}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn combine_is_weighted_sum() {
        let sim = Similarity {
            price: 0.5,
            rating: 1.0,
            package: 1.0,
            municipality: 1.0,
            category: 1.0,
            distance: 1.0,
        };
        let score = WeightSet::default().combine(&sim);
        assert!((score - (0.25 + 0.20 + 0.15 + 0.15 + 0.10 + 0.15)).abs() < 1e-12);
    }
}
