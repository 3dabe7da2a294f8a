//! ISO 3166-1 alpha-2 <-> alpha-3 country code mapping
//!
//! Fixed bidirectional table. The forward map is the source of truth; the
//! reverse map is built by inversion at first use and checked for lossless
//! round-tripping (a duplicate on either side is a data bug, not an input
//! condition).

use std::collections::HashMap;
use std::sync::LazyLock;

/// Alpha-2 -> alpha-3 pairs, alphabetical by alpha-2 code.
const ISO_PAIRS: &[(&str, &str)] = &[
    ("AE", "ARE"), ("AF", "AFG"), ("AL", "ALB"), ("AM", "ARM"),
    ("AO", "AGO"), ("AR", "ARG"), ("AT", "AUT"), ("AU", "AUS"),
    ("AZ", "AZE"), ("BA", "BIH"), ("BD", "BGD"), ("BE", "BEL"),
    ("BG", "BGR"), ("BH", "BHR"), ("BO", "BOL"), ("BR", "BRA"),
    ("BW", "BWA"), ("BY", "BLR"), ("CA", "CAN"), ("CD", "COD"),
    ("CH", "CHE"), ("CI", "CIV"), ("CL", "CHL"), ("CM", "CMR"),
    ("CN", "CHN"), ("CO", "COL"), ("CR", "CRI"), ("CU", "CUB"),
    ("CY", "CYP"), ("CZ", "CZE"), ("DE", "DEU"), ("DK", "DNK"),
    ("DO", "DOM"), ("DZ", "DZA"), ("EC", "ECU"), ("EE", "EST"),
    ("EG", "EGY"), ("ES", "ESP"), ("ET", "ETH"), ("FI", "FIN"),
    ("FR", "FRA"), ("GB", "GBR"), ("GE", "GEO"), ("GH", "GHA"),
    ("GR", "GRC"), ("GT", "GTM"), ("HK", "HKG"), ("HN", "HND"),
    ("HR", "HRV"), ("HU", "HUN"), ("ID", "IDN"), ("IE", "IRL"),
    ("IL", "ISR"), ("IN", "IND"), ("IQ", "IRQ"), ("IR", "IRN"),
    ("IS", "ISL"), ("IT", "ITA"), ("JM", "JAM"), ("JO", "JOR"),
    ("JP", "JPN"), ("KE", "KEN"), ("KG", "KGZ"), ("KH", "KHM"),
    ("KP", "PRK"), ("KR", "KOR"), ("KW", "KWT"), ("KZ", "KAZ"),
    ("LA", "LAO"), ("LB", "LBN"), ("LK", "LKA"), ("LT", "LTU"),
    ("LU", "LUX"), ("LV", "LVA"), ("LY", "LBY"), ("MA", "MAR"),
    ("MD", "MDA"), ("ME", "MNE"), ("MK", "MKD"), ("MM", "MMR"),
    ("MN", "MNG"), ("MT", "MLT"), ("MX", "MEX"), ("MY", "MYS"),
    ("MZ", "MOZ"), ("NG", "NGA"), ("NI", "NIC"), ("NL", "NLD"),
    ("NO", "NOR"), ("NP", "NPL"), ("NZ", "NZL"), ("OM", "OMN"),
    ("PA", "PAN"), ("PE", "PER"), ("PH", "PHL"), ("PK", "PAK"),
    ("PL", "POL"), ("PT", "PRT"), ("PY", "PRY"), ("QA", "QAT"),
    ("RO", "ROU"), ("RS", "SRB"), ("RU", "RUS"), ("SA", "SAU"),
    ("SD", "SDN"), ("SE", "SWE"), ("SG", "SGP"), ("SI", "SVN"),
    ("SK", "SVK"), ("SN", "SEN"), ("SO", "SOM"), ("SV", "SLV"),
    ("SY", "SYR"), ("TH", "THA"), ("TJ", "TJK"), ("TM", "TKM"),
    ("TN", "TUN"), ("TR", "TUR"), ("TW", "TWN"), ("TZ", "TZA"),
    ("UA", "UKR"), ("UG", "UGA"), ("US", "USA"), ("UY", "URY"),
    ("UZ", "UZB"), ("VE", "VEN"), ("VN", "VNM"), ("YE", "YEM"),
    ("ZA", "ZAF"), ("ZM", "ZMB"), ("ZW", "ZWE"),
];

static ALPHA2_TO_ALPHA3: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ISO_PAIRS.iter().copied().collect());

static ALPHA3_TO_ALPHA2: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ISO_PAIRS.iter().map(|&(a2, a3)| (a3, a2)).collect());

/// Resolve a 2-letter code to its 3-letter counterpart.
///
/// Returns `None` for codes outside the table; callers must treat that as
/// "countable but not placeable" rather than an error.
pub fn alpha2_to_alpha3(code: &str) -> Option<&'static str> {
    ALPHA2_TO_ALPHA3.get(code).copied()
}

/// Resolve a 3-letter code back to its 2-letter counterpart.
pub fn alpha3_to_alpha2(code: &str) -> Option<&'static str> {
    ALPHA3_TO_ALPHA2.get(code).copied()
}

/// Fail-fast consistency check: the inversion must be lossless.
///
/// Run once at startup (and from tests). A size mismatch means a duplicate
/// alpha-2 or alpha-3 entry slipped into `ISO_PAIRS`.
pub fn verify_table() -> Result<(), String> {
    if ALPHA2_TO_ALPHA3.len() != ISO_PAIRS.len() {
        return Err(format!(
            "duplicate alpha-2 code in ISO table ({} pairs, {} distinct)",
            ISO_PAIRS.len(),
            ALPHA2_TO_ALPHA3.len()
        ));
    }
    if ALPHA3_TO_ALPHA2.len() != ISO_PAIRS.len() {
        return Err(format!(
            "duplicate alpha-3 code in ISO table ({} pairs, {} distinct)",
            ISO_PAIRS.len(),
            ALPHA3_TO_ALPHA2.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_bijective() {
        verify_table().expect("ISO table must invert losslessly");
        for &(a2, a3) in ISO_PAIRS {
            assert_eq!(alpha2_to_alpha3(a2), Some(a3));
            assert_eq!(alpha3_to_alpha2(a3), Some(a2));
        }
    }

    #[test]
    fn known_pairs_resolve() {
        assert_eq!(alpha2_to_alpha3("US"), Some("USA"));
        assert_eq!(alpha2_to_alpha3("DE"), Some("DEU"));
        assert_eq!(alpha2_to_alpha3("GB"), Some("GBR"));
        assert_eq!(alpha3_to_alpha2("JPN"), Some("JP"));
    }

    #[test]
    fn unknown_codes_return_none() {
        assert_eq!(alpha2_to_alpha3("XX"), None);
        assert_eq!(alpha2_to_alpha3("us"), None); // case-sensitive
        assert_eq!(alpha3_to_alpha2("XXX"), None);
    }
}
