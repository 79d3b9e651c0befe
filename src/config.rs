pub mod constant {
    pub const DEFAULT_TOP_N: usize = 5;
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Stand-in denominator added when a normalisation range collapses to zero.
    pub const RANGE_EPSILON: f64 = 1e-9;
    /// Zero-based line holding the vendor CSV header; the sheet export carries a title row above it.
    pub const VENDOR_HEADER_ROW: usize = 1;
    pub const VENDORS_CSV_PATH: &str = "vendors.csv";
    pub const COORDS_CSV_PATH: &str = "coords.csv";
    pub const OUTPUT_CSV_PATH: &str = "recommendations.csv";
    pub const SEED: u64 = 64;
}

pub mod column {
    pub const VENDOR_NAME: &str = "Vendor Name";
    pub const CATEGORY: &str = "Category";
    pub const MUNICIPALITY: &str = "Municipality";
    pub const ESTIMATED_PRICE: &str = "Estimated Price";
    pub const RATING: &str = "Rating";
    pub const PACKAGE: &str = "Package";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const CITY: &str = "City";
    pub const DISTANCE_KM: &str = "Distance_km";
    pub const SCORE: &str = "Score";
    pub const EXPLANATION: &str = "Explanation";

    pub const REQUIRED: [&str; 4] = [ESTIMATED_PRICE, RATING, CATEGORY, MUNICIPALITY];
}
