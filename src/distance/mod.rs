pub mod haversine;
pub mod lookup;

pub use haversine::haversine_km;
pub use lookup::CoordinateTable;
