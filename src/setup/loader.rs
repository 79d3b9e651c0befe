use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::config::column;
use crate::domain::types::{missing_columns, MunicipalityCoordinate, VendorRecord, VendorTable};
use crate::error::{Error, Result};

/// Column name -> position, as found in a header row.
struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    fn new(record: &StringRecord) -> Self {
        let names: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Header { names, index }
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index.get(name).and_then(|&i| record.get(i))
    }

    fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64> {
    // Spreadsheet exports sometimes keep thousands separators.
    // NaN and infinities parse fine but poison every min/max over the pool.
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidField {
            row: line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_optional_number(raw: Option<&str>, column: &str, line: usize) -> Result<Option<f64>> {
    match raw {
        Some(v) if !v.is_empty() => parse_number(v, column, line).map(Some),
        _ => Ok(None),
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|v| v.is_empty())
}

/// Reads a vendor sheet whose header sits on the zero-based line `header_row`.
/// Lines above the header are ignored.
pub fn read_vendors<R: io::Read>(reader: R, header_row: usize) -> Result<VendorTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = rdr.records();
    let header = match rows.nth(header_row) {
        Some(row) => Header::new(&row?),
        None => {
            warn!("Vendor CSV ended before header row {}", header_row);
            return Err(Error::Schema {
                missing: column::REQUIRED.iter().map(|c| c.to_string()).collect(),
            });
        }
    };

    let missing = missing_columns(&header.names);
    if !missing.is_empty() {
        return Err(Error::Schema { missing });
    }

    let known = [
        column::VENDOR_NAME,
        column::CATEGORY,
        column::MUNICIPALITY,
        column::ESTIMATED_PRICE,
        column::RATING,
        column::PACKAGE,
        column::LATITUDE,
        column::LONGITUDE,
    ];

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        if is_blank(&row) {
            continue;
        }
        let line = line_of(&row);
        let text = |name: &str| header.get(&row, name).unwrap_or_default().to_string();

        let estimated_price = parse_number(
            header.get(&row, column::ESTIMATED_PRICE).unwrap_or_default(),
            column::ESTIMATED_PRICE,
            line,
        )?;
        let rating = parse_number(
            header.get(&row, column::RATING).unwrap_or_default(),
            column::RATING,
            line,
        )?;
        let latitude = parse_optional_number(header.get(&row, column::LATITUDE), column::LATITUDE, line)?;
        let longitude =
            parse_optional_number(header.get(&row, column::LONGITUDE), column::LONGITUDE, line)?;

        let extra: BTreeMap<String, String> = header
            .names
            .iter()
            .filter(|n| !n.is_empty() && !known.contains(&n.as_str()))
            .map(|n| (n.clone(), text(n.as_str())))
            .collect();

        records.push(VendorRecord {
            vendor_name: text(column::VENDOR_NAME),
            category: text(column::CATEGORY),
            municipality: text(column::MUNICIPALITY),
            estimated_price,
            rating,
            package: text(column::PACKAGE),
            latitude,
            longitude,
            extra,
        });
    }

    debug!("Vendor columns: {:?}", header.names);
    Ok(VendorTable::with_columns(header.names, records))
}

pub fn load_vendors(path: impl AsRef<Path>, header_row: usize) -> Result<VendorTable> {
    let path = path.as_ref();
    let table = read_vendors(File::open(path)?, header_row)?;
    info!("Loaded {} vendors from {}", table.len(), path.display());
    Ok(table)
}

/// Reads municipality coordinates. The name column may be called `City` or `Municipality`.
pub fn read_coordinates<R: io::Read>(reader: R) -> Result<Vec<MunicipalityCoordinate>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = Header::new(rdr.headers()?);
    let name_column = if header.has(column::MUNICIPALITY) {
        column::MUNICIPALITY
    } else {
        column::CITY
    };

    let missing: Vec<String> = [name_column, column::LATITUDE, column::LONGITUDE]
        .iter()
        .filter(|c| !header.has(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::Schema { missing });
    }

    let mut coords = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if is_blank(&row) {
            continue;
        }
        let line = line_of(&row);
        coords.push(MunicipalityCoordinate {
            municipality: header.get(&row, name_column).unwrap_or_default().to_string(),
            latitude: parse_number(
                header.get(&row, column::LATITUDE).unwrap_or_default(),
                column::LATITUDE,
                line,
            )?,
            longitude: parse_number(
                header.get(&row, column::LONGITUDE).unwrap_or_default(),
                column::LONGITUDE,
                line,
            )?,
        });
    }
    Ok(coords)
}

pub fn load_coordinates(path: impl AsRef<Path>) -> Result<Vec<MunicipalityCoordinate>> {
    let path = path.as_ref();
    let coords = read_coordinates(File::open(path)?)?;
    info!("Loaded {} municipality coordinates from {}", coords.len(), path.display());
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENDORS: &str = "\
Quezon Event Suppliers,,,,,,,,
Vendor Name,Category,Municipality,Estimated Price,Rating,Package,Latitude,Longitude,Contact
Bright Nights,Lights,Lucban,\"40,000\",4.5,Standard,14.1131,121.5569,0917
Glow Co,Lights,Lucena,60000,4.8,Premium,,,
";

    #[test]
    fn reads_vendors_below_title_row() {
        let table = read_vendors(VENDORS.as_bytes(), 1).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_coordinates());
        assert!(table.has_column("Contact"));

        let first = &table.records[0];
        assert_eq!(first.vendor_name, "Bright Nights");
        assert_eq!(first.estimated_price, 40_000.0);
        assert_eq!(first.coordinates(), Some((14.1131, 121.5569)));
        assert_eq!(first.extra.get("Contact").map(String::as_str), Some("0917"));

        let second = &table.records[1];
        assert_eq!(second.package, "Premium");
        assert_eq!(second.coordinates(), None);
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let csv = "Vendor Name,Category,Municipality,Rating\nA,Lights,Lucban,4.0\n";
        match read_vendors(csv.as_bytes(), 0) {
            Err(Error::Schema { missing }) => assert_eq!(missing, vec!["Estimated Price"]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let csv = "Category,Municipality,Estimated Price,Rating\nLights,Lucban,100,great\n";
        assert!(matches!(
            read_vendors(csv.as_bytes(), 0),
            Err(Error::InvalidField { column, .. }) if column == "Rating"
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for bad in ["NaN", "inf", "-infinity"] {
            let csv = format!(
                "Category,Municipality,Estimated Price,Rating\nLights,Lucban,50000,4.9\nLights,Lucban,50000,{bad}\n"
            );
            match read_vendors(csv.as_bytes(), 0) {
                Err(Error::InvalidField { row, column, value }) => {
                    assert_eq!(row, 3);
                    assert_eq!(column, "Rating");
                    assert_eq!(value, bad);
                }
                other => panic!("expected invalid field for {bad}, got {other:?}"),
            }
        }

        let csv = "City,Latitude,Longitude\nLucban,NaN,121.5569\n";
        assert!(matches!(
            read_coordinates(csv.as_bytes()),
            Err(Error::InvalidField { column, .. }) if column == "Latitude"
        ));
    }

    #[test]
    fn reads_city_column_as_municipality() {
        let csv = "City,Latitude,Longitude\nLucban,14.1131,121.5569\nLucena,13.9414,121.6234\n";
        let coords = read_coordinates(csv.as_bytes()).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].municipality, "Lucena");
        assert_eq!(coords[1].longitude, 121.6234);
    }

    #[test]
    fn coordinates_without_latitude_are_rejected() {
        let csv = "Municipality,Longitude\nLucban,121.5569\n";
        assert!(matches!(read_coordinates(csv.as_bytes()), Err(Error::Schema { .. })));
    }
}
