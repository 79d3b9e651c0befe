pub mod loader;

pub use loader::{load_coordinates, load_vendors, read_coordinates, read_vendors};
