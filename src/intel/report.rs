//! Suspicious-IP report scanner
//!
//! The upstream agent returns a free-text answer embedding zero or more
//! repetitions of:
//!
//! ```text
//! IP: <dotted-quad>  Geolocation: Source - <CC> (<text>), Destination - <CC> (<text>)
//! ```
//!
//! Codes are uppercase 2-letter and matched case-sensitively; whitespace
//! between fields is one-or-more characters. The grammar lives here and
//! nowhere else.

use std::sync::LazyLock;

use regex::Regex;

/// One extracted observation. Transient; rebuilt on every ingestion cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreatRecord {
    pub ip: String,
    pub source: String,
    pub destination: String,
}

static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"IP:\s+(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\s+Geolocation:\s+Source\s+-\s+([A-Z]{2})\s+\([^)]*\),\s+Destination\s+-\s+([A-Z]{2})\s+\([^)]*\)",
    )
    .expect("threat record pattern is valid")
});

/// Scan free text for threat records, in order of appearance.
///
/// Non-matching text contributes nothing; an empty or unrelated answer
/// yields an empty iterator rather than an error.
pub fn scan(answer: &str) -> impl Iterator<Item = ThreatRecord> + '_ {
    RECORD_PATTERN.captures_iter(answer).map(|caps| ThreatRecord {
        ip: caps[1].to_string(),
        source: caps[2].to_string(),
        destination: caps[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_canonical_example() {
        let text = "IP: 1.2.3.4  Geolocation: Source - US (United States), Destination - DE (Germany)";
        let records: Vec<_> = scan(text).collect();
        assert_eq!(
            records,
            vec![ThreatRecord {
                ip: "1.2.3.4".to_string(),
                source: "US".to_string(),
                destination: "DE".to_string(),
            }]
        );
    }

    #[test]
    fn extracts_multiple_records_in_order() {
        let text = "Found these: IP: 9.9.9.9 Geolocation: Source - CN (China), Destination - US (United States). \
                    Also IP: 8.8.8.8  Geolocation: Source - RU (Russia), Destination - FR (France).";
        let records: Vec<_> = scan(text).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "CN");
        assert_eq!(records[1].ip, "8.8.8.8");
        assert_eq!(records[1].destination, "FR");
    }

    #[test]
    fn tolerates_extra_whitespace_between_fields() {
        let text = "IP:   10.0.0.1   Geolocation:  Source  -  GB  (UK),  Destination  -  JP  (Japan)";
        let records: Vec<_> = scan(text).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "GB");
        assert_eq!(records[0].destination, "JP");
    }

    #[test]
    fn lowercase_codes_do_not_match() {
        let text = "IP: 1.2.3.4 Geolocation: Source - us (United States), Destination - de (Germany)";
        assert_eq!(scan(text).count(), 0);
    }

    #[test]
    fn empty_and_unrelated_text_yield_nothing() {
        assert_eq!(scan("").count(), 0);
        assert_eq!(scan("No suspicious activity was found today.").count(), 0);
    }
}
