use crate::domain::types::VendorRecord;
use crate::utils::eq_ignore_case;

fn yes_no(matched: bool) -> &'static str {
    if matched {
        "yes"
    } else {
        "no"
    }
}

/// Human-readable summary of why a row scored the way it did, e.g.
/// `price_diff=10000; rating=4.8; package_match=yes; municipality_match=yes; distance=3.2km`.
pub fn explain(
    record: &VendorRecord,
    budget: f64,
    package: Option<&str>,
    municipality: Option<&str>,
    distance_km: Option<f64>,
) -> String {
    let mut parts = vec![
        format!("price_diff={}", (record.estimated_price - budget).abs().trunc() as i64),
        format!("rating={:.1}", record.rating),
    ];
    if let Some(pkg) = package {
        parts.push(format!("package_match={}", yes_no(eq_ignore_case(&record.package, pkg))));
    }
    if let Some(muni) = municipality {
        parts.push(format!(
            "municipality_match={}",
            yes_no(eq_ignore_case(&record.municipality, muni))
        ));
    }
    if let Some(d) = distance_km {
        parts.push(format!("distance={:.1}km", d));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VendorRecord {
        VendorRecord {
            vendor_name: "Bright Nights".to_string(),
            category: "Lights".to_string(),
            municipality: "Lucban".to_string(),
            estimated_price: 60_000.0,
            rating: 4.8,
            package: "Standard".to_string(),
            latitude: None,
            longitude: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn minimal_explanation() {
        assert_eq!(explain(&record(), 50_000.0, None, None, None), "price_diff=10000; rating=4.8");
    }

    #[test]
    fn full_explanation_keeps_fragment_order() {
        assert_eq!(
            explain(&record(), 50_000.0, Some("premium"), Some("LUCBAN"), Some(3.24)),
            "price_diff=10000; rating=4.8; package_match=no; municipality_match=yes; distance=3.2km"
        );
    }

    #[test]
    fn price_diff_is_truncated() {
        let mut r = record();
        r.estimated_price = 100.9;
        assert!(explain(&r, 0.0, None, None, None).starts_with("price_diff=100;"));
    }
}
