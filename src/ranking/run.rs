use std::env;
use std::error::Error;
use std::path::Path;

use colored::*;
use csv::Writer;
use dotenv::dotenv;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::column;
use crate::config::constant::{
    COORDS_CSV_PATH, DEFAULT_TOP_N, OUTPUT_CSV_PATH, VENDORS_CSV_PATH, VENDOR_HEADER_ROW,
};
use crate::distance::CoordinateTable;
use crate::domain::types::{RankedResult, UserPreferences};
use crate::domain::weights::WeightSet;
use crate::error::{self, Result};
use crate::setup::loader::{load_coordinates, load_vendors};

use super::scorer::VendorScorer;

/// Everything the CLI reads from the environment (or `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub vendors_csv: String,
    pub coords_csv: String,
    pub output_csv: String,
    pub header_row: usize,
    pub top_n: usize,
    pub strict_service: bool,
    pub weights: WeightSet,
    pub prefs: UserPreferences,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str| -> Result<Option<f64>> {
            get(key)
                .map(|v| {
                    v.parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .ok_or_else(|| error::Error::InvalidField {
                            row: 0,
                            column: key.to_string(),
                            value: v.clone(),
                        })
                })
                .transpose()
        };
        let count = |key: &str, default: usize| -> Result<usize> {
            match get(key) {
                Some(v) => v.parse::<usize>().map_err(|_| error::Error::InvalidField {
                    row: 0,
                    column: key.to_string(),
                    value: v,
                }),
                None => Ok(default),
            }
        };

        let municipality = get("PREF_MUNICIPALITY")
            .ok_or_else(|| error::Error::MissingSetting("PREF_MUNICIPALITY".to_string()))?;

        let weights = match get("VENDOR_WEIGHTS") {
            Some(raw) => WeightSet::from_json(&raw)?,
            None => WeightSet::default(),
        };

        let strict_service = match get("STRICT_SERVICE").map(|v| v.to_lowercase()) {
            Some(v) => !matches!(v.as_str(), "0" | "false" | "no" | "off"),
            None => true,
        };

        Ok(Settings {
            vendors_csv: get("VENDORS_CSV").unwrap_or_else(|| VENDORS_CSV_PATH.to_string()),
            coords_csv: get("COORDS_CSV").unwrap_or_else(|| COORDS_CSV_PATH.to_string()),
            output_csv: get("OUTPUT_CSV").unwrap_or_else(|| OUTPUT_CSV_PATH.to_string()),
            header_row: count("VENDOR_HEADER_ROW", VENDOR_HEADER_ROW)?,
            top_n: count("TOP_N", DEFAULT_TOP_N)?,
            strict_service,
            weights,
            prefs: UserPreferences {
                municipality,
                category: get("PREF_CATEGORY"),
                budget: number("PREF_BUDGET")?,
                package: get("PREF_PACKAGE"),
            },
        })
    }
}

/// Initialize tracing and environment
fn init_tracing_and_env() -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .init();

    dotenv().ok();
    Ok(())
}

pub fn run() -> std::result::Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let settings = Settings::from_env()?;
    debug!("Settings: {:?}", settings);

    let (vendors, scorer) = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        let vendors = load_vendors(&settings.vendors_csv, settings.header_row)?;
        let coords = CoordinateTable::from_entries(load_coordinates(&settings.coords_csv)?)?;
        let scorer = VendorScorer::new(coords)
            .with_weights(settings.weights.clone())
            .with_strict_service(settings.strict_service);
        (vendors, scorer)
    };

    info!(
        "Recommending up to {} of {} vendors for {}",
        settings.top_n,
        vendors.len(),
        settings.prefs.municipality
    );

    let result = scorer.recommend(&vendors, &settings.prefs, settings.top_n)?;
    if result.is_empty() {
        warn!("No recommendations produced");
    }

    print_result(&result);
    save_to_csv(&result, &settings.output_csv)?;
    info!("Wrote {} rows to {}", result.len(), settings.output_csv);

    Ok(())
}

/// Writes the full ranked table, one column per entry of `result.columns`.
pub fn save_to_csv(result: &RankedResult, filename: impl AsRef<Path>) -> Result<()> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(&result.columns)?;

    for row in &result.rows {
        wtr.write_record(result.row_values(row))?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_result(result: &RankedResult) {
    println!(
        "{}",
        format!(
            "{:<4} {:<24} {:<14} {:<14} {:>12} {:>6} {:>7}  {}",
            "#",
            column::VENDOR_NAME,
            column::CATEGORY,
            column::MUNICIPALITY,
            column::ESTIMATED_PRICE,
            column::RATING,
            column::SCORE,
            column::EXPLANATION
        )
        .bold()
    );

    for (rank, row) in result.rows.iter().enumerate() {
        let r = &row.record;
        let score = format!("{:.4}", row.score);
        println!(
            "{:<4} {:<24} {:<14} {:<14} {:>12.0} {:>6.1} {:>7}  {}",
            rank + 1,
            r.vendor_name,
            r.category,
            r.municipality,
            r.estimated_price,
            r.rating,
            if rank == 0 { score.green() } else { score.normal() },
            row.explanation
        );
    }
}
