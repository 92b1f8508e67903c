//! Configuration management for SkyGlass.
//!
//! The ground station reads a single TOML document. Every section is optional
//! and falls back to the built-in defaults below, so an empty file is a valid
//! configuration.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::debug;

/// Host serving the MJPEG camera streams in the default catalog.
const DEFAULT_STREAM_HOST: &str = "http://172.29.181.42:8000";

/// Number of cameras in the default catalog.
const DEFAULT_CAMERA_COUNT: u32 = 10;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassConfig {
    pub logging: LoggingConfig,
    pub map: MapConfig,
    pub cameras: CameraConfig,
}

/// Logging defaults; `RUST_LOG` always takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// Map layer configuration: icon assets, reserved stations and track expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tracks not heard from for this long are dropped. Zero disables pruning.
    pub stale_after_ms: u64,
    pub icons: IconConfig,
    pub stations: Vec<StationConfig>,
}

/// Icon asset references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Icon used when no status-specific icon applies; also the selection halo.
    pub baseline: String,
    /// Icon used for every reserved station regardless of status.
    pub station: String,
    /// Status icons keyed by severity name (`INFO`, `WARNING`, `ERROR`, `CRITICAL`).
    pub severity: BTreeMap<String, String>,
}

/// A reserved station identity with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: String,
    /// Display name; a reserved id without a name renders as "Not found".
    #[serde(default)]
    pub name: Option<String>,
}

/// Camera console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Hold duration before a press counts as a long press.
    pub long_press_ms: u64,
    pub feeds: Vec<FeedConfig>,
}

/// One gimbal camera reachable over the message hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub ip: Ipv4Addr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: 0,
            icons: IconConfig::default(),
            stations: default_stations(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        let severity = [
            ("INFO", "ArmPlane.png"),
            ("WARNING", "drone-x-black-warning-32x32.png"),
            ("ERROR", "errorPlane.png"),
            ("CRITICAL", "errorPlane.png"),
        ]
        .into_iter()
        .map(|(level, icon)| (level.to_string(), icon.to_string()))
        .collect();

        Self {
            baseline: "plane-icon.png".to_string(),
            station: "rvt.png".to_string(),
            severity,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 300,
            feeds: default_feeds(),
        }
    }
}

fn default_stations() -> Vec<StationConfig> {
    [
        ("21", "Team 1"),
        ("22", "Team 2"),
        ("23", "Team 3"),
        ("24", "Team 4"),
        ("25", "Ground Station"),
    ]
    .into_iter()
    .map(|(id, name)| StationConfig {
        id: id.to_string(),
        name: Some(name.to_string()),
    })
    .collect()
}

fn default_feeds() -> Vec<FeedConfig> {
    (1..=DEFAULT_CAMERA_COUNT)
        .map(|n| FeedConfig {
            id: n,
            name: format!("Camera {n}"),
            url: format!("{DEFAULT_STREAM_HOST}/video{n}"),
            ip: Ipv4Addr::new(192, 168, 6, (120 + n) as u8),
        })
        .collect()
}

impl GlassConfig {
    /// Load and validate a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            stations = config.map.stations.len(),
            cameras = config.cameras.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Serialize(e.to_string()))
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let icons = &self.map.icons;
        if icons.baseline.trim().is_empty() {
            return Err(CoreError::Validation("map.icons.baseline is empty".into()));
        }
        if icons.station.trim().is_empty() {
            return Err(CoreError::Validation("map.icons.station is empty".into()));
        }
        if let Some((level, _)) = icons.severity.iter().find(|(_, icon)| icon.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "map.icons.severity.{level} is empty"
            )));
        }

        let mut station_ids = HashSet::new();
        for station in &self.map.stations {
            if !station_ids.insert(station.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate station id {}",
                    station.id
                )));
            }
        }

        if self.cameras.long_press_ms == 0 {
            return Err(CoreError::Validation(
                "cameras.long_press_ms must be greater than zero".into(),
            ));
        }

        let mut feed_ids = HashSet::new();
        let mut feed_ips = HashSet::new();
        for feed in &self.cameras.feeds {
            if !feed_ids.insert(feed.id) {
                return Err(CoreError::Validation(format!(
                    "duplicate camera id {}",
                    feed.id
                )));
            }
            if !feed_ips.insert(feed.ip) {
                return Err(CoreError::Validation(format!(
                    "duplicate camera ip {}",
                    feed.ip
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_addresses() {
        let feeds = default_feeds();
        assert_eq!(feeds.len(), 10);
        assert_eq!(feeds[0].ip, Ipv4Addr::new(192, 168, 6, 121));
        assert_eq!(feeds[9].ip, Ipv4Addr::new(192, 168, 6, 130));
        assert_eq!(feeds[9].url, "http://172.29.181.42:8000/video10");
        assert_eq!(feeds[4].name, "Camera 5");
    }

    #[test]
    fn test_default_stations() {
        let stations = default_stations();
        assert_eq!(stations.len(), 5);
        assert_eq!(stations[0].id, "21");
        assert_eq!(stations[4].name.as_deref(), Some("Ground Station"));
    }

    #[test]
    fn test_zero_long_press_rejected() {
        let mut config = GlassConfig::default();
        config.cameras.long_press_ms = 0;
        assert!(matches!(config.validate(), Err(CoreError::Validation(_))));
    }
}
