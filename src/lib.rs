pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod ranking;
pub mod setup;
pub mod utils;

pub use distance::CoordinateTable;
pub use domain::{
    Criterion, MunicipalityCoordinate, RankedResult, RankedVendor, Similarity, UserPreferences,
    VendorRecord, VendorTable, WeightSet,
};
pub use error::{Error, Result};
pub use ranking::VendorScorer;
