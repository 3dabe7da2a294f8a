//! Upstream threat-feed HTTP client
//!
//! Two read-only GET endpoints: the blacklisted-IP list and the free-text
//! suspicious-IP report. Transport failures and unexpected payload shapes
//! collapse into the same recoverable outcome: the caller logs it and
//! renders a "no data" state. Nothing here retries and nothing is fatal.

use std::fmt;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::intel::geo::CoordinateTable;

#[derive(Debug)]
pub enum FeedError {
    Transport(String),
    Payload(String),
    /// The payload parsed but carried no usable data (success=false or a
    /// missing nested field).
    NoData,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Transport(e) => write!(f, "network error: {}", e),
            FeedError::Payload(e) => write!(f, "payload error: {}", e),
            FeedError::NoData => write!(f, "no data"),
        }
    }
}

// ============================================================================
// Wire payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BlacklistEntry {
    #[serde(rename = "countryCode", default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlacklistPayload {
    #[serde(default)]
    success: bool,
    data: Option<BlacklistData>,
}

#[derive(Debug, Deserialize)]
struct BlacklistData {
    ips: Option<Vec<BlacklistEntry>>,
}

#[derive(Debug, Deserialize)]
struct ReportPayload {
    #[serde(default)]
    success: bool,
    data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
struct ReportData {
    agent_responses: Option<AgentResponses>,
}

#[derive(Debug, Deserialize)]
struct AgentResponses {
    #[serde(rename = "OpenSearchAgent")]
    opensearch: Option<AgentAnswer>,
}

#[derive(Debug, Deserialize)]
struct AgentAnswer {
    answer: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

pub struct FeedClient {
    blacklist_url: String,
    report_url: String,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(blacklist_url: String, report_url: String, timeout: Duration) -> Self {
        Self {
            blacklist_url,
            report_url,
            timeout,
        }
    }

    /// Fetch the blacklisted-IP feed.
    pub fn fetch_blacklist(&self) -> Result<Vec<BlacklistEntry>, FeedError> {
        let body = self.get(&self.blacklist_url)?;
        decode_blacklist(&body)
    }

    /// Fetch the suspicious-IP report and dig out the free-text answer.
    pub fn fetch_report_answer(&self) -> Result<String, FeedError> {
        let body = self.get(&self.report_url)?;
        decode_report(&body)
    }

    /// Fetch the coordinate reference table from a URL (optional alternative
    /// to the local file).
    pub fn fetch_coordinates(&self, url: &str) -> Result<CoordinateTable, FeedError> {
        let body = self.get(url)?;
        CoordinateTable::parse(&body).map_err(|e| FeedError::Payload(e.to_string()))
    }

    fn get(&self, url: &str) -> Result<String, FeedError> {
        let resp = ureq::get(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        resp.into_string()
            .map_err(|e| FeedError::Transport(e.to_string()))
    }
}

/// Decode a blacklist payload body (exposed for offline use and tests).
pub fn decode_blacklist(body: &str) -> Result<Vec<BlacklistEntry>, FeedError> {
    let payload: BlacklistPayload =
        serde_json::from_str(body).map_err(|e| FeedError::Payload(e.to_string()))?;
    if !payload.success {
        return Err(FeedError::NoData);
    }
    payload
        .data
        .and_then(|d| d.ips)
        .ok_or(FeedError::NoData)
}

/// Decode a suspicious-IP report body down to its free-text answer.
pub fn decode_report(body: &str) -> Result<String, FeedError> {
    let payload: ReportPayload =
        serde_json::from_str(body).map_err(|e| FeedError::Payload(e.to_string()))?;
    if !payload.success {
        return Err(FeedError::NoData);
    }
    payload
        .data
        .and_then(|d| d.agent_responses)
        .and_then(|a| a.opensearch)
        .and_then(|a| a.answer)
        .ok_or(FeedError::NoData)
}

/// Log a feed failure at the right level and move on. Every failure is the
/// same from the renderer's point of view: an empty snapshot.
pub fn note_failure(feed: &str, err: &FeedError) {
    match err {
        FeedError::NoData => warn!("{} feed returned no data", feed),
        other => warn!("{} feed unavailable: {}", feed, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_blacklist_entries() {
        let body = r#"{"success": true, "data": {"ips": [
            {"countryCode": "US", "ip": "1.2.3.4"},
            {"countryCode": "DE"},
            {"ip": "5.6.7.8"}
        ]}}"#;
        let entries = decode_blacklist(body).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].country_code.as_deref(), Some("US"));
        assert_eq!(entries[2].country_code, None);
    }

    #[test]
    fn blacklist_without_success_is_no_data() {
        let body = r#"{"success": false, "data": {"ips": []}}"#;
        assert!(matches!(decode_blacklist(body), Err(FeedError::NoData)));
    }

    #[test]
    fn blacklist_missing_ips_is_no_data() {
        let body = r#"{"success": true, "data": {}}"#;
        assert!(matches!(decode_blacklist(body), Err(FeedError::NoData)));
    }

    #[test]
    fn malformed_blacklist_is_a_payload_error() {
        assert!(matches!(
            decode_blacklist("not json"),
            Err(FeedError::Payload(_))
        ));
    }

    #[test]
    fn decodes_report_answer() {
        let body = r#"{"success": true, "data": {"agent_responses": {
            "OpenSearchAgent": {"answer": "IP: 1.2.3.4 ..."}
        }}}"#;
        assert_eq!(decode_report(body).unwrap(), "IP: 1.2.3.4 ...");
    }

    #[test]
    fn report_missing_agent_is_no_data() {
        let body = r#"{"success": true, "data": {"agent_responses": {}}}"#;
        assert!(matches!(decode_report(body), Err(FeedError::NoData)));
        let body = r#"{"success": true, "data": {}}"#;
        assert!(matches!(decode_report(body), Err(FeedError::NoData)));
    }
}
