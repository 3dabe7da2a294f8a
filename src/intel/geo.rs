//! Country centroid reference table
//!
//! Loads the static coordinate file: a JSON array of objects keyed
//! `"Alpha-2 code"`, `"Latitude (average)"`, `"Longitude (average)"`,
//! `"Country"`. Loaded once at startup and shared read-only. A missing or
//! malformed file leaves the table empty; records without a coordinate are
//! still counted, just never placed.

use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Centroid and display name for one country, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f32,
    pub lon: f32,
    pub name: String,
}

#[derive(Deserialize)]
struct CoordinateRow {
    #[serde(rename = "Alpha-2 code")]
    alpha2: String,
    #[serde(rename = "Latitude (average)")]
    latitude: f32,
    #[serde(rename = "Longitude (average)")]
    longitude: f32,
    #[serde(rename = "Country")]
    country: String,
}

/// Immutable alpha-2 -> centroid mapping.
#[derive(Default)]
pub struct CoordinateTable {
    entries: HashMap<String, GeoCoordinate>,
}

impl CoordinateTable {
    /// Empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from an explicit path, falling back to default locations.
    /// Any failure degrades to an empty table.
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let Some(path) = Self::find_file(explicit_path) else {
            warn!("no coordinate reference file found; markers and arcs disabled");
            return Self::empty();
        };
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(table) => table,
                Err(e) => {
                    warn!("malformed coordinate file {}: {}", path.display(), e);
                    Self::empty()
                }
            },
            Err(e) => {
                warn!("cannot read coordinate file {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Parse the JSON array format described above.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<CoordinateRow> = serde_json::from_str(content)?;
        let entries = rows
            .into_iter()
            .map(|row| {
                (
                    row.alpha2,
                    GeoCoordinate {
                        lat: row.latitude,
                        lon: row.longitude,
                        name: row.country,
                    },
                )
            })
            .collect();
        Ok(Self { entries })
    }

    fn find_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
        // 1. Explicit path from CLI/config
        if let Some(path) = explicit_path {
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        // 2. Default locations
        let candidates = [
            dirs::config_dir().map(|p| p.join("threatglobe/country_coords.json")),
            Some(PathBuf::from("./country_coords.json")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Look up a centroid by 2-letter code.
    pub fn get(&self, alpha2: &str) -> Option<&GeoCoordinate> {
        self.entries.get(alpha2)
    }

    /// Display name for a 2-letter code, falling back to the code itself.
    pub fn display_name(&self, alpha2: &str) -> String {
        self.entries
            .get(alpha2)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| alpha2.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterator over all centroids (used by demo mode).
    pub fn coordinates(&self) -> impl Iterator<Item = &GeoCoordinate> {
        self.entries.values()
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<(&str, f32, f32, &str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, lat, lon, name)| {
                    (
                        code.to_string(),
                        GeoCoordinate {
                            lat,
                            lon,
                            name: name.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"Alpha-2 code": "US", "Latitude (average)": 38.0, "Longitude (average)": -97.0, "Country": "United States"},
        {"Alpha-2 code": "DE", "Latitude (average)": 51.0, "Longitude (average)": 9.0, "Country": "Germany"}
    ]"#;

    #[test]
    fn parses_reference_rows() {
        let table = CoordinateTable::parse(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);
        let us = table.get("US").unwrap();
        assert_eq!(us.lat, 38.0);
        assert_eq!(us.lon, -97.0);
        assert_eq!(us.name, "United States");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CoordinateTable::parse("{\"not\": \"an array\"}").is_err());
    }

    #[test]
    fn display_name_falls_back_to_code() {
        let table = CoordinateTable::parse(SAMPLE).unwrap();
        assert_eq!(table.display_name("DE"), "Germany");
        assert_eq!(table.display_name("ZZ"), "ZZ");
    }

    #[test]
    fn unreadable_file_degrades_to_empty() {
        let table = CoordinateTable::load_file(Path::new("/nonexistent/coords.json"));
        assert!(table.is_empty());
        assert!(table.get("US").is_none());
    }
}
