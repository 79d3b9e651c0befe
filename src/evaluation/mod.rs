pub mod explanation;
pub mod similarity;

pub use explanation::explain;
pub use similarity::*;
