pub mod run;
pub mod scorer;

pub use run::{run, save_to_csv, Settings};
pub use scorer::VendorScorer;
