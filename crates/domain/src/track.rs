//! Track layer: one [`TrackedEntity`] per UAV identity.
//!
//! The layer creates an entity the first time telemetry names it, applies
//! partial updates through the entity mutators, and drops tracks that are
//! removed or stop reporting.

use crate::entity::TrackedEntity;
use crate::error::{DomainError, Result};
use crate::feature::{Drawable, MapFeature};
use crate::severity::Severity;
use crate::style::StyleLayer;
use crate::tables::StyleTables;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Last reported position. Position never affects style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

/// Partial attribute update for one UAV. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// `Some(None)` (explicit `null`) clears the status; unknown text also
    /// clears it.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
    #[serde(default)]
    pub timestamp_ms: u64,
}

/// Distinguish an explicit `null` from an absent field.
fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TelemetryUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn heading(mut self, degrees: f64) -> Self {
        self.heading = Some(degrees);
        self
    }

    pub fn status(mut self, status: Option<Severity>) -> Self {
        self.status = Some(status.map(|s| s.as_str().to_string()));
        self
    }

    pub fn position(mut self, position: GeoPoint) -> Self {
        self.position = Some(position);
        self
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Inbound event driving the track layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackEvent {
    /// Attribute update, creating the track on first sight
    Telemetry(TelemetryUpdate),
    /// Exclusive selection: exactly these identities end up selected
    Select { ids: Vec<String> },
    /// Stop tracking an identity
    Remove { id: String },
}

impl TrackEvent {
    /// Decode one JSON event.
    pub fn from_json(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| DomainError::MalformedEvent(e.to_string()))
    }
}

/// Identities affected by one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackChanges {
    /// Tracks whose rendering changed
    pub changed: Vec<String>,
    /// Tracks no longer present
    pub removed: Vec<String>,
}

impl TrackChanges {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// A tracked entity with its map placement.
#[derive(Debug, Clone)]
pub struct Track {
    entity: TrackedEntity,
    position: Option<GeoPoint>,
    last_seen_ms: u64,
}

impl Track {
    pub fn entity(&self) -> &TrackedEntity {
        &self.entity
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    pub fn last_seen_ms(&self) -> u64 {
        self.last_seen_ms
    }

    fn is_stale(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_seen_ms) > ttl_ms
    }
}

impl Drawable for Track {
    fn feature_id(&self) -> &str {
        self.entity.identity()
    }

    fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    fn layers(&self) -> &[StyleLayer] {
        self.entity.current_style()
    }
}

/// All UAVs currently on the map, keyed by identity.
#[derive(Debug, Clone)]
pub struct TrackLayer {
    tables: Arc<StyleTables>,
    tracks: BTreeMap<String, Track>,
}

impl TrackLayer {
    pub fn new(tables: Arc<StyleTables>) -> Self {
        Self {
            tables,
            tracks: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Identities in map order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Apply one inbound event.
    pub fn apply(&mut self, event: TrackEvent) -> TrackChanges {
        match event {
            TrackEvent::Telemetry(update) => {
                let id = update.id.clone();
                let changed = if self.apply_telemetry(update) {
                    vec![id]
                } else {
                    Vec::new()
                };
                TrackChanges {
                    changed,
                    removed: Vec::new(),
                }
            }
            TrackEvent::Select { ids } => TrackChanges {
                changed: self.select(&ids),
                removed: Vec::new(),
            },
            TrackEvent::Remove { id } => TrackChanges {
                changed: Vec::new(),
                removed: if self.remove(&id) { vec![id] } else { Vec::new() },
            },
        }
    }

    /// Apply a telemetry update. Returns whether the track's rendering
    /// changed, which is always the case for a newly created track.
    pub fn apply_telemetry(&mut self, update: TelemetryUpdate) -> bool {
        let TelemetryUpdate {
            id,
            heading,
            status,
            color,
            label_color,
            position,
            timestamp_ms,
        } = update;

        let mut changed = false;
        let track = match self.tracks.entry(id) {
            std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::btree_map::Entry::Vacant(entry) => {
                info!(identity = %entry.key(), "Tracking new UAV");
                changed = true;
                let entity = TrackedEntity::new(entry.key().clone(), Arc::clone(&self.tables));
                entry.insert(Track {
                    entity,
                    position: None,
                    last_seen_ms: timestamp_ms,
                })
            }
        };

        track.last_seen_ms = track.last_seen_ms.max(timestamp_ms);

        if let Some(degrees) = heading {
            changed |= track.entity.set_heading(degrees);
        }
        if let Some(status) = status {
            let severity = status.as_deref().and_then(Severity::parse_lenient);
            if severity.is_none() {
                if let Some(text) = status.as_deref() {
                    debug!(
                        identity = %track.entity.identity(),
                        status = text,
                        "Unrecognized status, using baseline icon"
                    );
                }
            }
            changed |= track.entity.set_status(severity);
        }
        if let Some(color) = color {
            changed |= track.entity.set_color(&color);
        }
        if let Some(label_color) = label_color {
            changed |= track.entity.set_label_color(&label_color);
        }
        if let Some(position) = position {
            if track.position != Some(position) {
                track.position = Some(position);
                changed = true;
            }
        }

        changed
    }

    /// Select exactly `ids`, clearing every other selection. Unknown
    /// identities are ignored. Returns the identities whose selection flipped.
    pub fn select(&mut self, ids: &[String]) -> Vec<String> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.tracks
            .iter_mut()
            .filter_map(|(id, track)| {
                track
                    .entity
                    .set_selected(wanted.contains(id.as_str()))
                    .then(|| id.clone())
            })
            .collect()
    }

    /// Stop tracking an identity.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.tracks.remove(id).is_some();
        if removed {
            info!(identity = %id, "Stopped tracking UAV");
        }
        removed
    }

    /// Drop tracks not heard from within `ttl_ms` of `now_ms`.
    pub fn prune_stale(&mut self, now_ms: u64, ttl_ms: u64) -> Vec<String> {
        let stale: Vec<String> = self
            .tracks
            .iter()
            .filter(|(_, track)| track.is_stale(now_ms, ttl_ms))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            self.tracks.remove(id);
            debug!(identity = %id, now_ms, ttl_ms, "Pruned stale track");
        }
        stale
    }

    /// Renderer view of one track.
    pub fn feature(&self, id: &str) -> Option<MapFeature> {
        self.tracks.get(id).map(MapFeature::from_drawable)
    }

    /// Renderer view of every track, in identity order.
    pub fn features(&self) -> Vec<MapFeature> {
        self.tracks.values().map(MapFeature::from_drawable).collect()
    }
}
