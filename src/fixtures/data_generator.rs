use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::types::{MunicipalityCoordinate, VendorRecord, VendorTable};

/// Quezon province towns with approximate town-centre coordinates.
const MUNICIPALITIES: [(&str, f64, f64); 6] = [
    ("Lucban", 14.1131, 121.5569),
    ("Lucena", 13.9414, 121.6234),
    ("Tayabas", 14.0259, 121.5928),
    ("Sariaya", 13.9628, 121.5262),
    ("Pagbilao", 13.9719, 121.6873),
    ("Candelaria", 13.9311, 121.4233),
];

pub const CATEGORIES: [&str; 5] = ["Lights", "Sound", "Catering", "Venue", "Photography"];
pub const PACKAGES: [&str; 3] = ["Basic", "Standard", "Premium"];

/// Coordinate table covering every municipality the generator places vendors in.
pub fn generate_coordinates() -> Vec<MunicipalityCoordinate> {
    MUNICIPALITIES
        .iter()
        .map(|&(name, lat, lon)| MunicipalityCoordinate {
            municipality: name.to_string(),
            latitude: lat,
            longitude: lon,
        })
        .collect()
}

/// Generates `count` vendors deterministically from `seed`.
///
/// Vendors sit within a few kilometres of their town centre. Roughly one in
/// five has no coordinates and category/municipality casing varies, so the
/// case-insensitive paths get exercised.
pub fn generate_vendors(count: usize, seed: u64) -> VendorTable {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let (town, lat, lon) = *MUNICIPALITIES.choose(&mut rng).unwrap_or(&MUNICIPALITIES[0]);
        let category = *CATEGORIES.choose(&mut rng).unwrap_or(&CATEGORIES[0]);
        let package = *PACKAGES.choose(&mut rng).unwrap_or(&PACKAGES[0]);

        let located = rng.gen_bool(0.8);
        let (latitude, longitude) = if located {
            (
                Some(lat + rng.gen_range(-0.03..0.03)),
                Some(lon + rng.gen_range(-0.03..0.03)),
            )
        } else {
            (None, None)
        };

        let category = if rng.gen_bool(0.2) {
            category.to_uppercase()
        } else {
            category.to_string()
        };

        records.push(VendorRecord {
            vendor_name: format!("Vendor {:03}", i + 1),
            category,
            municipality: town.to_string(),
            // Whole-thousand prices, as quoted on the vendor sheets.
            estimated_price: (rng.gen_range(5..=150) * 1_000) as f64,
            rating: (rng.gen_range(25..=50) as f64) / 10.0,
            package: package.to_string(),
            latitude,
            longitude,
            extra: Default::default(),
        });
    }

    info!("Generated {} vendors (seed {})", count, seed);
    VendorTable::from_records(records)
}
