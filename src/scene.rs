//! Joins feed snapshots with the coordinate table into render-ready data
//!
//! One `Scene` per refresh cycle, fully replacing the previous one. Views
//! never mutate a scene; a country with no centroid still shows up in the
//! totals and the top list, just without a marker.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use log::info;

use crate::feed::{self, BlacklistEntry, FeedClient, FeedError};
use crate::intel::aggregate::{self, RelationArc};
use crate::intel::geo::CoordinateTable;
use crate::intel::iso;

/// A placeable per-country marker. Angles in radians.
#[derive(Clone, Debug)]
pub struct Marker {
    pub lat: f32,
    pub lon: f32,
    pub name: String,
    pub count: u32,
}

/// A directed arc between two centroids. Angles in radians.
#[derive(Clone, Debug)]
pub struct SceneArc {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneSource {
    /// At least one feed delivered data.
    Live,
    /// Both feeds failed; nothing to show.
    NoData,
}

/// Snapshot handed to the renderers.
pub struct Scene {
    pub markers: Vec<Marker>,
    pub arcs: Vec<SceneArc>,
    pub total: u64,
    pub top: Vec<(String, u32)>,
    pub countries: usize,
    pub source: SceneSource,
    pub updated: DateTime<Local>,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            markers: Vec::new(),
            arcs: Vec::new(),
            total: 0,
            top: Vec::new(),
            countries: 0,
            source: SceneSource::NoData,
            updated: Local::now(),
        }
    }
}

/// Fetch both feeds and build a fresh scene.
pub fn build(client: &FeedClient, coords: &CoordinateTable) -> Scene {
    assemble(
        client.fetch_blacklist(),
        client.fetch_report_answer(),
        coords,
    )
}

/// Merge the two feed outcomes into a scene.
///
/// Either feed may fail independently; a single live feed still yields a
/// live scene. Both failing yields `SceneSource::NoData`.
pub fn assemble(
    blacklist: Result<Vec<BlacklistEntry>, FeedError>,
    report: Result<String, FeedError>,
    coords: &CoordinateTable,
) -> Scene {
    // Display-keyed counts: 3-letter code where mappable, raw code otherwise.
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    // Placement-keyed counts: 2-letter code, only for marker building.
    let mut placed: BTreeMap<String, u32> = BTreeMap::new();
    let mut arcs: Vec<SceneArc> = Vec::new();
    let mut any_live = false;

    match blacklist {
        Ok(entries) => {
            any_live = true;
            let summary = aggregate::ingest_blacklist(
                entries
                    .iter()
                    .map(|e| e.country_code.as_deref().unwrap_or("")),
            );
            for (cc2, count) in &summary.counts {
                let key = iso::alpha2_to_alpha3(cc2).unwrap_or(cc2).to_string();
                *counts.entry(key).or_insert(0) += count;
                *placed.entry(cc2.clone()).or_insert(0) += count;
            }
        }
        Err(e) => feed::note_failure("blacklist", &e),
    }

    match report {
        Ok(answer) => {
            any_live = true;
            let snapshot = aggregate::ingest_report(&answer, coords);
            for (key, agg) in &snapshot.aggregates {
                *counts.entry(key.clone()).or_insert(0) += agg.count;
                // Reverse to alpha-2 for placement; raw 2-letter keys pass
                // straight through.
                let cc2 = iso::alpha3_to_alpha2(key).unwrap_or(key);
                *placed.entry(cc2.to_string()).or_insert(0) += agg.count;
            }
            arcs.extend(snapshot.arcs.iter().map(relation_to_scene_arc));
        }
        Err(e) => feed::note_failure("suspicious-ip report", &e),
    }

    let markers: Vec<Marker> = placed
        .iter()
        .filter_map(|(cc2, &count)| {
            coords.get(cc2).map(|c| Marker {
                lat: c.lat.to_radians(),
                lon: c.lon.to_radians(),
                name: c.name.clone(),
                count,
            })
        })
        .collect();

    let total: u64 = counts.values().map(|&c| c as u64).sum();
    let top = aggregate::top_n(&counts, aggregate::TOP_N);
    let scene = Scene {
        countries: counts.len(),
        markers,
        arcs,
        total,
        top,
        source: if any_live { SceneSource::Live } else { SceneSource::NoData },
        updated: Local::now(),
    };

    info!(
        "scene rebuilt: {} observations, {} markers, {} arcs",
        scene.total,
        scene.markers.len(),
        scene.arcs.len()
    );
    scene
}

fn relation_to_scene_arc(arc: &RelationArc) -> SceneArc {
    SceneArc {
        from: (arc.source.lat.to_radians(), arc.source.lon.to_radians()),
        to: (
            arc.destination.lat.to_radians(),
            arc.destination.lon.to_radians(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coords() -> CoordinateTable {
        CoordinateTable::from_entries(vec![
            ("US", 38.0, -97.0, "United States"),
            ("DE", 51.0, 9.0, "Germany"),
        ])
    }

    fn blacklist_entries(codes: &[&str]) -> Vec<BlacklistEntry> {
        codes
            .iter()
            .map(|code| BlacklistEntry {
                country_code: Some(code.to_string()),
                ip: None,
            })
            .collect()
    }

    #[test]
    fn one_live_feed_still_yields_a_live_scene() {
        let scene = assemble(
            Ok(blacklist_entries(&["US", "US"])),
            Err(FeedError::NoData),
            &sample_coords(),
        );
        assert_eq!(scene.source, SceneSource::Live);
        assert_eq!(scene.total, 2);
        assert_eq!(scene.markers.len(), 1);
        assert!(scene.arcs.is_empty());

        let scene = assemble(
            Err(FeedError::Transport("refused".to_string())),
            Ok("IP: 1.2.3.4 Geolocation: Source - US (US), Destination - DE (DE)".to_string()),
            &sample_coords(),
        );
        assert_eq!(scene.source, SceneSource::Live);
        assert_eq!(scene.total, 2);
        assert_eq!(scene.arcs.len(), 1);
    }

    #[test]
    fn both_feeds_dead_yields_no_data() {
        let scene = assemble(
            Err(FeedError::Transport("refused".to_string())),
            Err(FeedError::NoData),
            &sample_coords(),
        );
        assert_eq!(scene.source, SceneSource::NoData);
        assert_eq!(scene.total, 0);
        assert!(scene.markers.is_empty());
        assert!(scene.arcs.is_empty());
        assert!(scene.top.is_empty());
    }

    #[test]
    fn feeds_merge_under_one_display_key_per_country() {
        // Blacklist counts arrive keyed alpha-2, report aggregates alpha-3;
        // both must land on the same display entry and the same marker.
        let scene = assemble(
            Ok(blacklist_entries(&["US", "US", "DE"])),
            Ok("IP: 1.2.3.4 Geolocation: Source - US (US), Destination - DE (DE)".to_string()),
            &sample_coords(),
        );

        assert_eq!(scene.source, SceneSource::Live);
        assert_eq!(scene.total, 5);
        assert_eq!(scene.countries, 2);
        assert_eq!(
            scene.top,
            vec![("USA".to_string(), 3), ("DEU".to_string(), 2)]
        );

        let us = scene.markers.iter().find(|m| m.name == "United States");
        assert_eq!(us.map(|m| m.count), Some(3));
        let de = scene.markers.iter().find(|m| m.name == "Germany");
        assert_eq!(de.map(|m| m.count), Some(2));
    }

    #[test]
    fn unmappable_codes_count_but_never_place() {
        let scene = assemble(
            Ok(blacklist_entries(&["XX", "US"])),
            Err(FeedError::NoData),
            &sample_coords(),
        );
        assert_eq!(scene.total, 2);
        assert_eq!(scene.countries, 2);
        // XX has neither an alpha-3 mapping nor a centroid; it keeps its raw
        // key in the totals and simply gets no marker.
        assert!(scene.top.iter().any(|(code, _)| code == "XX"));
        assert_eq!(scene.markers.len(), 1);
    }
}
