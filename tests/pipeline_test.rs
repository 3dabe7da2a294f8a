//! End-to-end pipeline tests: wire payload -> decode -> ingest -> snapshot.

use threatglobe::feed::{decode_blacklist, decode_report, FeedError};
use threatglobe::intel::aggregate::{ingest_blacklist, ingest_report};
use threatglobe::intel::geo::CoordinateTable;
use threatglobe::intel::severity::{classify, ATTACK_VOLUME, SEVERITY_SCORE};

const COORDS: &str = r#"[
    {"Alpha-2 code": "US", "Latitude (average)": 38.0, "Longitude (average)": -97.0, "Country": "United States"},
    {"Alpha-2 code": "DE", "Latitude (average)": 51.0, "Longitude (average)": 9.0, "Country": "Germany"},
    {"Alpha-2 code": "NZ", "Latitude (average)": -41.0, "Longitude (average)": 174.0, "Country": "New Zealand"}
]"#;

#[test]
fn blacklist_payload_flows_into_counts() {
    let body = r#"{"success": true, "data": {"ips": [
        {"countryCode": "US", "ip": "1.1.1.1"},
        {"countryCode": "US", "ip": "2.2.2.2"},
        {"countryCode": "DE", "ip": "3.3.3.3"},
        {"ip": "4.4.4.4"}
    ]}}"#;

    let entries = decode_blacklist(body).expect("payload decodes");
    let summary = ingest_blacklist(
        entries
            .iter()
            .map(|e| e.country_code.as_deref().unwrap_or("")),
    );

    // The entry without a country code is skipped silently.
    assert_eq!(summary.total, 3);
    assert_eq!(summary.counts["US"], 2);
    assert_eq!(summary.counts["DE"], 1);
    assert_eq!(
        summary.top,
        vec![("US".to_string(), 2), ("DE".to_string(), 1)]
    );
}

#[test]
fn report_payload_flows_into_aggregates_and_arcs() {
    let body = r#"{"success": true, "data": {"agent_responses": {"OpenSearchAgent": {
        "answer": "Suspicious traffic detected. IP: 1.2.3.4  Geolocation: Source - US (United States), Destination - DE (Germany). IP: 5.6.7.8 Geolocation: Source - US (United States), Destination - NZ (New Zealand)."
    }}}}"#;

    let coords = CoordinateTable::parse(COORDS).unwrap();
    let answer = decode_report(body).expect("payload decodes");
    let snapshot = ingest_report(&answer, &coords);

    assert_eq!(snapshot.aggregates["USA"].count, 2);
    assert_eq!(snapshot.aggregates["DEU"].count, 1);
    assert_eq!(snapshot.aggregates["NZL"].count, 1);
    assert_eq!(snapshot.total_observations(), 4);

    // US->DE passes the longitude filter; US->NZ (271 degrees apart) does not.
    assert_eq!(snapshot.arcs.len(), 1);
    assert_eq!(snapshot.arcs[0].source_name, "United States");
    assert_eq!(snapshot.arcs[0].destination_name, "Germany");

    // Severity bands applied the way the dashboard labels them.
    assert_eq!(classify(snapshot.aggregates["USA"].count as f32, ATTACK_VOLUME).label, "Low");
    assert_eq!(classify(8.5, SEVERITY_SCORE).label, "Critical");
}

#[test]
fn missing_answer_is_recoverable_no_data() {
    let body = r#"{"success": true, "data": {"agent_responses": {"OpenSearchAgent": {}}}}"#;
    assert!(matches!(decode_report(body), Err(FeedError::NoData)));
}

#[test]
fn no_data_state_yields_empty_snapshot_not_error() {
    let coords = CoordinateTable::parse(COORDS).unwrap();
    let snapshot = ingest_report("The agent found nothing remarkable.", &coords);
    assert!(snapshot.is_empty());
    assert!(snapshot.arcs.is_empty());
    assert!(snapshot.top(5).is_empty());
}
