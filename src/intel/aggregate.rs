//! Per-country aggregation
//!
//! Both feeds reduce to the same shape: a per-country count mapping plus
//! derived summaries (total, top-N). The suspicious-IP report additionally
//! carries per-country IP detail lists and source->destination relation
//! arcs. Every ingestion cycle rebuilds its snapshot from scratch; nothing
//! is mutated after the snapshot is handed to a renderer.

use std::collections::BTreeMap;

use log::debug;

use super::geo::{CoordinateTable, GeoCoordinate};
use super::iso;
use super::report;

/// Arcs whose endpoints differ by more than this many degrees of longitude
/// are dropped. Raw longitude delta, not great-circle distance: the filter
/// intentionally avoids ambiguous antimeridian wraparound at the cost of
/// dropping some legitimate short paths.
pub const MAX_ARC_LON_DELTA: f32 = 180.0;

/// How many entries the default top list carries.
pub const TOP_N: usize = 5;

// ============================================================================
// Blacklist feed
// ============================================================================

/// Snapshot of the blacklisted-IP feed, grouped by 2-letter country code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlacklistSummary {
    pub counts: BTreeMap<String, u32>,
    pub total: u64,
    pub top: Vec<(String, u32)>,
}

/// Group blacklist entries by country code and count occurrences.
///
/// Entries with an empty code are skipped silently and do not count toward
/// the total.
pub fn ingest_blacklist<'a, I>(codes: I) -> BlacklistSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut total: u64 = 0;

    for code in codes {
        if code.is_empty() {
            continue;
        }
        *counts.entry(code.to_string()).or_insert(0) += 1;
        total += 1;
    }

    let top = top_n(&counts, TOP_N);
    debug!("blacklist snapshot: {} countries, {} observations", counts.len(), total);

    BlacklistSummary { counts, total, top }
}

/// The `n` largest counts, descending; ties break alphabetically by code.
///
/// The tie-break is deliberate: upstream ordering varies between fetches,
/// so "first seen wins" would not be reproducible.
pub fn top_n(counts: &BTreeMap<String, u32>, n: usize) -> Vec<(String, u32)> {
    let mut entries: Vec<(String, u32)> =
        counts.iter().map(|(code, &count)| (code.clone(), count)).collect();
    // BTreeMap iteration is alphabetical; a stable sort on count keeps that
    // order among equals.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

// ============================================================================
// Suspicious-IP report
// ============================================================================

/// Role an IP played at a given country.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpRole {
    Source,
    Destination,
}

impl IpRole {
    pub fn label(&self) -> &'static str {
        match self {
            IpRole::Source => "Source",
            IpRole::Destination => "Destination",
        }
    }
}

/// One contributing IP entry in a country's detail list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpDetail {
    pub ip: String,
    pub role: IpRole,
    /// Display name of the other end, falling back to its raw code.
    pub counterpart: String,
}

/// Per-country derived state for the suspicious-IP feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryAggregate {
    pub count: u32,
    pub ips: Vec<IpDetail>,
}

/// A directed source->destination pair for arc rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationArc {
    /// `(source, destination, sequence)` identity; keeps parallel arcs
    /// between the same pair distinguishable.
    pub id: String,
    pub source: GeoCoordinate,
    pub destination: GeoCoordinate,
    pub source_name: String,
    pub destination_name: String,
}

/// Full snapshot of one report ingestion cycle.
///
/// Aggregates are keyed by 3-letter code where the 2-letter code maps, by
/// the raw 2-letter code otherwise (counted but not placeable).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportSnapshot {
    pub aggregates: BTreeMap<String, CountryAggregate>,
    pub arcs: Vec<RelationArc>,
}

impl ReportSnapshot {
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty() && self.arcs.is_empty()
    }

    pub fn total_observations(&self) -> u64 {
        self.aggregates.values().map(|a| a.count as u64).sum()
    }

    pub fn counts(&self) -> BTreeMap<String, u32> {
        self.aggregates
            .iter()
            .map(|(code, agg)| (code.clone(), agg.count))
            .collect()
    }

    pub fn top(&self, n: usize) -> Vec<(String, u32)> {
        top_n(&self.counts(), n)
    }
}

/// Extract threat records from the free-text answer and aggregate them.
pub fn ingest_report(answer: &str, coords: &CoordinateTable) -> ReportSnapshot {
    let mut snapshot = ReportSnapshot::default();

    for record in report::scan(answer) {
        let source_key = aggregate_key(&record.source);
        let destination_key = aggregate_key(&record.destination);

        {
            let agg = snapshot.aggregates.entry(source_key).or_default();
            agg.count += 1;
            agg.ips.push(IpDetail {
                ip: record.ip.clone(),
                role: IpRole::Source,
                counterpart: coords.display_name(&record.destination),
            });
        }
        {
            let agg = snapshot.aggregates.entry(destination_key).or_default();
            agg.count += 1;
            agg.ips.push(IpDetail {
                ip: record.ip.clone(),
                role: IpRole::Destination,
                counterpart: coords.display_name(&record.source),
            });
        }

        if let Some(arc) = build_arc(&record, coords, snapshot.arcs.len()) {
            snapshot.arcs.push(arc);
        }
    }

    debug!(
        "report snapshot: {} countries, {} arcs",
        snapshot.aggregates.len(),
        snapshot.arcs.len()
    );
    snapshot
}

/// 3-letter key when the code maps, raw 2-letter key otherwise.
fn aggregate_key(alpha2: &str) -> String {
    iso::alpha2_to_alpha3(alpha2)
        .map(str::to_string)
        .unwrap_or_else(|| alpha2.to_string())
}

/// Arc rule: both endpoints mapped and located, distinct codes, and raw
/// longitude delta within [`MAX_ARC_LON_DELTA`].
fn build_arc(
    record: &report::ThreatRecord,
    coords: &CoordinateTable,
    sequence: usize,
) -> Option<RelationArc> {
    if record.source == record.destination {
        return None;
    }
    iso::alpha2_to_alpha3(&record.source)?;
    iso::alpha2_to_alpha3(&record.destination)?;
    let source = coords.get(&record.source)?.clone();
    let destination = coords.get(&record.destination)?.clone();

    if (source.lon - destination.lon).abs() > MAX_ARC_LON_DELTA {
        return None;
    }

    Some(RelationArc {
        id: format!("{}-{}-{}", record.source, record.destination, sequence),
        source_name: source.name.clone(),
        destination_name: destination.name.clone(),
        source,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coords() -> CoordinateTable {
        CoordinateTable::from_entries(vec![
            ("US", 38.0, -97.0, "United States"),
            ("DE", 51.0, 9.0, "Germany"),
            ("JP", 36.0, 138.0, "Japan"),
            ("NZ", -41.0, 174.0, "New Zealand"),
        ])
    }

    #[test]
    fn blacklist_counts_and_top() {
        let summary = ingest_blacklist(["US", "US", "DE"]);
        assert_eq!(summary.counts.get("US"), Some(&2));
        assert_eq!(summary.counts.get("DE"), Some(&1));
        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.top,
            vec![("US".to_string(), 2), ("DE".to_string(), 1)]
        );
    }

    #[test]
    fn blacklist_skips_empty_codes() {
        let summary = ingest_blacklist(["US", "", "DE", ""]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.counts.len(), 2);
    }

    #[test]
    fn blacklist_total_equals_sum_of_counts() {
        let codes = ["US", "DE", "", "FR", "US", "CN", "", "CN", "CN"];
        let summary = ingest_blacklist(codes);
        let sum: u64 = summary.counts.values().map(|&c| c as u64).sum();
        assert_eq!(sum, summary.total);
        assert_eq!(summary.total, codes.iter().filter(|c| !c.is_empty()).count() as u64);
    }

    #[test]
    fn top_n_ties_break_alphabetically() {
        let summary = ingest_blacklist(["DE", "US", "CN", "US", "CN", "DE"]);
        // All three at 2; order must be reproducible regardless of input order.
        assert_eq!(
            summary.top,
            vec![
                ("CN".to_string(), 2),
                ("DE".to_string(), 2),
                ("US".to_string(), 2)
            ]
        );
    }

    #[test]
    fn top_n_truncates() {
        let counts: BTreeMap<String, u32> =
            [("A", 5u32), ("B", 4), ("C", 3), ("D", 2)]
                .iter()
                .map(|&(k, v)| (k.to_string(), v))
                .collect();
        let top = top_n(&counts, 2);
        assert_eq!(top, vec![("A".to_string(), 5), ("B".to_string(), 4)]);
    }

    #[test]
    fn canonical_report_yields_one_arc_and_two_increments() {
        let text = "IP: 1.2.3.4  Geolocation: Source - US (United States), Destination - DE (Germany)";
        let snapshot = ingest_report(text, &sample_coords());

        assert_eq!(snapshot.aggregates["USA"].count, 1);
        assert_eq!(snapshot.aggregates["DEU"].count, 1);
        assert_eq!(snapshot.arcs.len(), 1);

        let arc = &snapshot.arcs[0];
        assert_eq!(arc.id, "US-DE-0");
        assert_eq!(arc.source.lon, -97.0);
        assert_eq!(arc.destination.lon, 9.0);
        assert_eq!(arc.source_name, "United States");
        assert_eq!(arc.destination_name, "Germany");
    }

    #[test]
    fn ip_details_record_role_and_counterpart() {
        let text = "IP: 1.2.3.4 Geolocation: Source - US (United States), Destination - DE (Germany)";
        let snapshot = ingest_report(text, &sample_coords());

        let us = &snapshot.aggregates["USA"].ips[0];
        assert_eq!(us.role, IpRole::Source);
        assert_eq!(us.counterpart, "Germany");

        let de = &snapshot.aggregates["DEU"].ips[0];
        assert_eq!(de.role, IpRole::Destination);
        assert_eq!(de.counterpart, "United States");
    }

    #[test]
    fn wide_longitude_delta_counts_but_drops_arc() {
        // US (-97) to NZ (174): raw delta 271 degrees, over the cap.
        let text = "IP: 5.6.7.8 Geolocation: Source - US (United States), Destination - NZ (New Zealand)";
        let snapshot = ingest_report(text, &sample_coords());

        assert_eq!(snapshot.aggregates["USA"].count, 1);
        assert_eq!(snapshot.aggregates["NZL"].count, 1);
        assert!(snapshot.arcs.is_empty());
    }

    #[test]
    fn arc_filter_is_symmetric_under_endpoint_swap() {
        let forward = "IP: 5.6.7.8 Geolocation: Source - US (United States), Destination - NZ (New Zealand)";
        let reverse = "IP: 5.6.7.8 Geolocation: Source - NZ (New Zealand), Destination - US (United States)";
        let coords = sample_coords();
        assert_eq!(
            ingest_report(forward, &coords).arcs.is_empty(),
            ingest_report(reverse, &coords).arcs.is_empty()
        );

        let forward_ok = "IP: 5.6.7.8 Geolocation: Source - US (United States), Destination - DE (Germany)";
        let reverse_ok = "IP: 5.6.7.8 Geolocation: Source - DE (Germany), Destination - US (United States)";
        let fa = ingest_report(forward_ok, &coords);
        let ra = ingest_report(reverse_ok, &coords);
        assert_eq!(fa.arcs.len(), 1);
        assert_eq!(ra.arcs.len(), 1);
        assert_eq!(fa.arcs[0].source, ra.arcs[0].destination);
        assert_eq!(fa.arcs[0].destination, ra.arcs[0].source);
    }

    #[test]
    fn same_country_counts_twice_but_never_arcs() {
        let text = "IP: 9.9.9.9 Geolocation: Source - US (United States), Destination - US (United States)";
        let snapshot = ingest_report(text, &sample_coords());
        assert_eq!(snapshot.aggregates["USA"].count, 2);
        assert!(snapshot.arcs.is_empty());
    }

    #[test]
    fn unmappable_code_keeps_raw_key_and_drops_arc() {
        // "XX" has no alpha-3 mapping and no coordinate.
        let text = "IP: 4.4.4.4 Geolocation: Source - XX (Unknown), Destination - DE (Germany)";
        let snapshot = ingest_report(text, &sample_coords());

        assert_eq!(snapshot.aggregates["XX"].count, 1);
        assert_eq!(snapshot.aggregates["DEU"].count, 1);
        assert!(snapshot.arcs.is_empty());
        // Counterpart name for the mapped side falls back to the raw code.
        assert_eq!(snapshot.aggregates["DEU"].ips[0].counterpart, "XX");
    }

    #[test]
    fn parallel_arcs_get_distinct_identities() {
        let text = "IP: 1.1.1.1 Geolocation: Source - US (US), Destination - DE (DE) \
                    IP: 2.2.2.2 Geolocation: Source - US (US), Destination - DE (DE)";
        let snapshot = ingest_report(text, &sample_coords());
        assert_eq!(snapshot.arcs.len(), 2);
        assert_ne!(snapshot.arcs[0].id, snapshot.arcs[1].id);
    }

    #[test]
    fn empty_answer_yields_empty_snapshot() {
        let snapshot = ingest_report("", &sample_coords());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_observations(), 0);
        assert!(snapshot.top(5).is_empty());
    }
}
