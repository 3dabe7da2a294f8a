use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub geo: GeoSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedSettings {
    pub blacklist_url: Option<String>,
    pub report_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeoSettings {
    /// Path to the country centroid JSON file.
    pub coordinates_file: Option<PathBuf>,
    /// Alternative: fetch the centroid table from a URL.
    pub coordinates_url: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threatglobe")
            .join("config.toml")
    }
}
