use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::types::MunicipalityCoordinate;
use crate::error::{Error, Result};

/// Municipality name -> (lat, lon), matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    by_name: HashMap<String, (f64, f64)>,
}

impl CoordinateTable {
    /// Builds the index. Repeated names are accepted only when they carry the
    /// same coordinates; otherwise the lookup would have to guess.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = MunicipalityCoordinate>,
    {
        let mut by_name: HashMap<String, (f64, f64)> = HashMap::new();
        for entry in entries {
            let key = normalise(&entry.municipality);
            let coords = (entry.latitude, entry.longitude);
            match by_name.get(&key) {
                Some(existing) if *existing == coords => {
                    trace!("Duplicate coordinate row for {}", entry.municipality);
                }
                Some(_) => return Err(Error::AmbiguousMunicipality(entry.municipality)),
                None => {
                    by_name.insert(key, coords);
                }
            }
        }
        debug!("Indexed coordinates for {} municipalities", by_name.len());
        Ok(CoordinateTable { by_name })
    }

    pub fn lookup(&self, municipality: &str) -> Result<(f64, f64)> {
        self.by_name
            .get(&normalise(municipality))
            .copied()
            .ok_or_else(|| Error::UnknownMunicipality(municipality.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn normalise(name: &str) -> String {
    name.trim().to_lowercase()
}
