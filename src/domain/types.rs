use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::column;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_name: String,
    pub category: String,
    pub municipality: String,
    pub estimated_price: f64,
    pub rating: f64,
    pub package: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Columns the scorer does not read, carried through to the output untouched.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl VendorRecord {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Cell value for a named column, formatted the way it is written back out.
    pub fn field(&self, name: &str) -> String {
        match name {
            column::VENDOR_NAME => self.vendor_name.clone(),
            column::CATEGORY => self.category.clone(),
            column::MUNICIPALITY => self.municipality.clone(),
            column::ESTIMATED_PRICE => self.estimated_price.to_string(),
            column::RATING => self.rating.to_string(),
            column::PACKAGE => self.package.clone(),
            column::LATITUDE => self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            column::LONGITUDE => self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

/// Vendor rows together with the column layout they were loaded with.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorTable {
    pub columns: Vec<String>,
    pub records: Vec<VendorRecord>,
}

impl VendorTable {
    /// Columns every hand-built table carries.
    pub fn standard_columns() -> Vec<String> {
        [
            column::VENDOR_NAME,
            column::CATEGORY,
            column::MUNICIPALITY,
            column::ESTIMATED_PRICE,
            column::RATING,
            column::PACKAGE,
            column::LATITUDE,
            column::LONGITUDE,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    pub fn from_records(records: Vec<VendorRecord>) -> Self {
        VendorTable {
            columns: Self::standard_columns(),
            records,
        }
    }

    pub fn with_columns(columns: Vec<String>, records: Vec<VendorRecord>) -> Self {
        VendorTable { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn has_coordinates(&self) -> bool {
        self.has_column(column::LATITUDE) && self.has_column(column::LONGITUDE)
    }

    pub fn validate_schema(&self) -> Result<()> {
        let missing = missing_columns(&self.columns);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema { missing })
        }
    }
}

/// Required vendor columns absent from `columns`, in declaration order.
pub fn missing_columns(columns: &[String]) -> Vec<String> {
    column::REQUIRED
        .iter()
        .filter(|req| !columns.iter().any(|c| c == *req))
        .map(|req| req.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityCoordinate {
    pub municipality: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub municipality: String,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub package: Option<String>,
}

impl UserPreferences {
    pub fn new(municipality: impl Into<String>) -> Self {
        UserPreferences {
            municipality: municipality.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    // Blank strings count as "no preference".
    pub fn requested_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn requested_package(&self) -> Option<&str> {
        non_blank(self.package.as_deref())
    }

    pub fn requested_municipality(&self) -> Option<&str> {
        non_blank(Some(self.municipality.as_str()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Per-criterion similarities that fed into a row's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Similarity {
    pub price: f64,
    pub rating: f64,
    pub package: f64,
    pub municipality: f64,
    pub category: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedVendor {
    pub record: VendorRecord,
    pub distance_km: Option<f64>,
    pub score: f64,
    pub explanation: String,
    pub similarity: Similarity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub columns: Vec<String>,
    pub rows: Vec<RankedVendor>,
}

impl RankedResult {
    pub fn empty(columns: Vec<String>) -> Self {
        RankedResult {
            columns,
            rows: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell values of one output row, aligned with `columns`.
    pub fn row_values(&self, row: &RankedVendor) -> Vec<String> {
        self.columns
            .iter()
            .map(|name| match name.as_str() {
                column::DISTANCE_KM => row.distance_km.map(|d| d.to_string()).unwrap_or_default(),
                column::SCORE => row.score.to_string(),
                column::EXPLANATION => row.explanation.clone(),
                other => row.record.field(other),
            })
            .collect()
    }
}
