use thiserror::Error;

use crate::domain::weights::Criterion;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Table is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("No coordinates known for municipality: {0}")]
    UnknownMunicipality(String),

    #[error("Municipality has conflicting coordinate entries: {0}")]
    AmbiguousMunicipality(String),

    #[error("Invalid weight for {criterion}: {value}")]
    InvalidWeight { criterion: Criterion, value: f64 },

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Missing setting: {0}")]
    MissingSetting(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
