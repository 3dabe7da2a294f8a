//! Severity bucketing
//!
//! One generic classifier over ordered `(threshold, label, color)` bands.
//! Two band tables are in use: attack volume (per-country observation
//! counts) and severity score (0-10 scale from upstream). Both carry a
//! 0-floor band, so every non-negative value classifies.

use crossterm::style::Color;

/// One severity band. Bands are ordered ascending by threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeverityBand {
    pub threshold: f32,
    pub label: &'static str,
    pub color: Color,
}

/// Attack-volume bands: observation counts per country.
pub const ATTACK_VOLUME: &[SeverityBand] = &[
    SeverityBand { threshold: 0.0, label: "Low", color: Color::Green },
    SeverityBand { threshold: 20.0, label: "Medium", color: Color::Yellow },
    SeverityBand { threshold: 50.0, label: "High", color: Color::Red },
];

/// Severity-score bands: upstream 0-10 average severity.
pub const SEVERITY_SCORE: &[SeverityBand] = &[
    SeverityBand { threshold: 0.0, label: "Medium", color: Color::Green },
    SeverityBand { threshold: 5.0, label: "High", color: Color::DarkYellow },
    SeverityBand { threshold: 7.0, label: "Critical", color: Color::Red },
];

/// Pick the band with the largest threshold not exceeding `value`.
///
/// Values below every threshold fall back to the lowest band; with the
/// 0-floor entries above that branch is unreachable for real inputs but
/// still defined.
pub fn classify(value: f32, bands: &'static [SeverityBand]) -> &'static SeverityBand {
    bands
        .iter()
        .rev()
        .find(|band| band.threshold <= value)
        .unwrap_or(&bands[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_threshold_not_exceeding_value() {
        assert_eq!(classify(0.0, ATTACK_VOLUME).label, "Low");
        assert_eq!(classify(19.9, ATTACK_VOLUME).label, "Low");
        assert_eq!(classify(20.0, ATTACK_VOLUME).label, "Medium");
        assert_eq!(classify(49.0, ATTACK_VOLUME).label, "Medium");
        assert_eq!(classify(50.0, ATTACK_VOLUME).label, "High");
        assert_eq!(classify(5000.0, ATTACK_VOLUME).label, "High");
    }

    #[test]
    fn score_bands_match_the_dashboard_thresholds() {
        assert_eq!(classify(4.9, SEVERITY_SCORE).label, "Medium");
        assert_eq!(classify(5.0, SEVERITY_SCORE).label, "High");
        assert_eq!(classify(6.9, SEVERITY_SCORE).label, "High");
        assert_eq!(classify(7.0, SEVERITY_SCORE).label, "Critical");
        assert_eq!(classify(10.0, SEVERITY_SCORE).label, "Critical");
    }

    #[test]
    fn monotonic_within_each_band() {
        // Every value in [t1, t2) classifies at t1.
        for window in ATTACK_VOLUME.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            let mid = (lo.threshold + hi.threshold) / 2.0;
            assert_eq!(classify(lo.threshold, ATTACK_VOLUME).label, lo.label);
            assert_eq!(classify(mid, ATTACK_VOLUME).label, lo.label);
        }
    }

    #[test]
    fn below_floor_falls_back_to_lowest_band() {
        assert_eq!(classify(-1.0, ATTACK_VOLUME).label, "Low");
        assert_eq!(classify(-0.5, SEVERITY_SCORE).label, "Medium");
    }
}
