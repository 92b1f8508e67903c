//! Read-only lookup tables injected into every tracked entity.
//!
//! Built once at process start from `[map]` configuration and shared through
//! an `Arc`. Lookups never fail: absent entries fall back to defaults.

use crate::error::{DomainError, Result};
use crate::severity::Severity;
use crate::style::IconRef;
use skyglass_core::MapConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Icon assets by status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTable {
    baseline: IconRef,
    station: IconRef,
    by_severity: BTreeMap<Severity, IconRef>,
}

impl IconTable {
    /// Create a table with no status icons.
    pub fn new(baseline: impl Into<IconRef>, station: impl Into<IconRef>) -> Self {
        Self {
            baseline: baseline.into(),
            station: station.into(),
            by_severity: BTreeMap::new(),
        }
    }

    /// Add or replace the icon for a severity.
    pub fn with_severity(mut self, severity: Severity, icon: impl Into<IconRef>) -> Self {
        self.by_severity.insert(severity, icon.into());
        self
    }

    /// Icon used without a status, and for the selection halo.
    pub fn baseline(&self) -> &IconRef {
        &self.baseline
    }

    /// Icon used by every reserved station.
    pub fn station(&self) -> &IconRef {
        &self.station
    }

    /// Icon for a status, falling back to the baseline icon.
    pub fn for_status(&self, status: Option<Severity>) -> &IconRef {
        status
            .and_then(|severity| self.by_severity.get(&severity))
            .unwrap_or(&self.baseline)
    }
}

/// Reserved station identities and their display names.
///
/// Membership and naming are separate: a reserved identity without a name is
/// still drawn as a station.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationDirectory {
    reserved: BTreeSet<String>,
    names: BTreeMap<String, String>,
}

impl StationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an identity, optionally naming it.
    pub fn reserve(mut self, identity: impl Into<String>, name: Option<&str>) -> Self {
        let identity = identity.into();
        if let Some(name) = name {
            self.names.insert(identity.clone(), name.to_string());
        }
        self.reserved.insert(identity);
        self
    }

    pub fn is_reserved(&self, identity: &str) -> bool {
        self.reserved.contains(identity)
    }

    pub fn display_name(&self, identity: &str) -> Option<&str> {
        self.names.get(identity).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}

/// Everything the projector looks up while deriving layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTables {
    pub icons: IconTable,
    pub stations: StationDirectory,
}

impl StyleTables {
    pub fn new(icons: IconTable, stations: StationDirectory) -> Self {
        Self { icons, stations }
    }

    /// The ground station's stock assets and team stations.
    pub fn standard() -> Self {
        let icons = IconTable::new("plane-icon.png", "rvt.png")
            .with_severity(Severity::Info, "ArmPlane.png")
            .with_severity(Severity::Warning, "drone-x-black-warning-32x32.png")
            .with_severity(Severity::Error, "errorPlane.png")
            .with_severity(Severity::Critical, "errorPlane.png");

        let stations = StationDirectory::new()
            .reserve("21", Some("Team 1"))
            .reserve("22", Some("Team 2"))
            .reserve("23", Some("Team 3"))
            .reserve("24", Some("Team 4"))
            .reserve("25", Some("Ground Station"));

        Self::new(icons, stations)
    }

    /// Build tables from the `[map]` configuration section.
    pub fn from_config(config: &MapConfig) -> Result<Self> {
        let mut icons = IconTable::new(
            config.icons.baseline.as_str(),
            config.icons.station.as_str(),
        );
        for (level, icon) in &config.icons.severity {
            let severity: Severity = level
                .parse()
                .map_err(|_| DomainError::InvalidTable(format!("unknown severity key {level}")))?;
            icons = icons.with_severity(severity, icon.as_str());
        }

        let mut stations = StationDirectory::new();
        for station in &config.stations {
            if stations.is_reserved(&station.id) {
                return Err(DomainError::InvalidTable(format!(
                    "duplicate station id {}",
                    station.id
                )));
            }
            stations = stations.reserve(station.id.as_str(), station.name.as_deref());
        }

        Ok(Self::new(icons, stations))
    }
}
