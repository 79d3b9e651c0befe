pub mod types;
pub mod weights;

pub use types::*;
pub use weights::{Criterion, WeightSet};
