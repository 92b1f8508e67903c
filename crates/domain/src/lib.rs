//! Domain module for the SkyGlass map layer
//!
//! This crate contains pure projection logic with no I/O dependencies:
//! - Tracked entity attributes and their derived style layers
//! - Injected icon and station lookup tables
//! - Track layer lifecycle (create on first sight, update, select, prune)
//! - Renderer-facing feature adapter
//!
//! # Examples
//!
//! ```
//! use skyglass_domain::{Severity, StyleTables, TrackedEntity};
//! use std::sync::Arc;
//!
//! let tables = Arc::new(StyleTables::standard());
//! let mut uav = TrackedEntity::new("7", tables);
//!
//! uav.set_heading(450.0);
//! uav.set_status(Some(Severity::Warning));
//! uav.set_selected(true);
//!
//! // halo, body, label
//! assert_eq!(uav.current_style().len(), 3);
//! assert_eq!(uav.heading(), 90.0);
//! ```

pub mod entity;
pub mod error;
pub mod feature;
pub mod severity;
pub mod style;
pub mod tables;
pub mod track;

pub use entity::{TrackedEntity, MISSING_IDENTITY_LABEL, UNKNOWN_STATION_LABEL};
pub use error::{DomainError, Result};
pub use feature::{Drawable, MapFeature};
pub use severity::Severity;
pub use style::{
    heading_to_rotation, normalize_heading, FontSize, IconLayer, IconRef, StyleLayer, TextAlign,
    TextLayer,
};
pub use tables::{IconTable, StationDirectory, StyleTables};
pub use track::{GeoPoint, TelemetryUpdate, Track, TrackChanges, TrackEvent, TrackLayer};
