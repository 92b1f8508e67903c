//! Tracked entity and its visual-state projection.
//!
//! A [`TrackedEntity`] is a plain record of the observable attributes of one
//! UAV plus the style layers derived from them. Every mutator compares the new
//! value with the current one first: an unchanged value returns `false` and
//! leaves the cached layer sequence untouched (the same `Arc`). A changed
//! value rebuilds the sequence before the mutator returns, so readers never
//! observe stale layers.
//!
//! Layer order is a rendering contract: `[halo?, body, label]`.

use crate::severity::Severity;
use crate::style::{
    heading_to_rotation, normalize_heading, FontSize, IconLayer, IconRef, StyleLayer, TextAlign,
    TextLayer, BODY_Z_INDEX, HALO_Z_INDEX, LABEL_OFFSET_Y,
};
use crate::tables::StyleTables;
use std::sync::Arc;
use tracing::{trace, warn};

/// Label of a reserved identity missing from the station name table.
pub const UNKNOWN_STATION_LABEL: &str = "Not found";

/// Label of an entity with an empty identity.
pub const MISSING_IDENTITY_LABEL: &str = "undefined";

const STATION_LABEL_FILL: &str = "white";
const VEHICLE_LABEL_FILL: &str = "black";

/// One UAV as seen by the map layer.
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    identity: String,
    heading: f64,
    selected: bool,
    status: Option<Severity>,
    body_color: String,
    label_color: String,
    tables: Arc<StyleTables>,
    layers: Arc<[StyleLayer]>,
}

impl TrackedEntity {
    /// Create an entity with default attributes and its initial layers.
    pub fn new(identity: impl Into<String>, tables: Arc<StyleTables>) -> Self {
        let mut entity = Self {
            identity: identity.into(),
            heading: 0.0,
            selected: false,
            status: None,
            body_color: String::new(),
            label_color: String::new(),
            tables,
            layers: Arc::from(Vec::<StyleLayer>::new()),
        };
        entity.rebuild();
        entity
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Heading in degrees, always within `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn status(&self) -> Option<Severity> {
        self.status
    }

    pub fn color(&self) -> &str {
        &self.body_color
    }

    pub fn label_color(&self) -> &str {
        &self.label_color
    }

    /// Whether this identity is a reserved station.
    pub fn is_station(&self) -> bool {
        self.tables.stations.is_reserved(&self.identity)
    }

    /// The cached layers. Never recomputes.
    pub fn current_style(&self) -> &Arc<[StyleLayer]> {
        &self.layers
    }

    /// Set the heading in degrees. Values are reduced into `[0, 360)` before
    /// comparison, so 450 and 90 are the same heading. Non-finite values are
    /// ignored.
    pub fn set_heading(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() {
            warn!(identity = %self.identity, degrees, "Ignoring non-finite heading");
            return false;
        }

        let heading = normalize_heading(degrees);
        if self.heading == heading {
            return false;
        }

        self.heading = heading;
        self.rebuild();
        true
    }

    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }

        self.selected = selected;
        self.rebuild();
        true
    }

    pub fn set_status(&mut self, status: Option<Severity>) -> bool {
        if self.status == status {
            return false;
        }

        self.status = status;
        self.rebuild();
        true
    }

    pub fn set_color(&mut self, color: &str) -> bool {
        if self.body_color == color {
            return false;
        }

        self.body_color = color.to_string();
        self.rebuild();
        true
    }

    /// Set the label fill. An empty string restores the default fill.
    pub fn set_label_color(&mut self, color: &str) -> bool {
        if self.label_color == color {
            return false;
        }

        self.label_color = color.to_string();
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.layers = Arc::from(self.derive_layers());
        trace!(
            identity = %self.identity,
            layers = self.layers.len(),
            "Rebuilt style layers"
        );
    }

    fn derive_layers(&self) -> Vec<StyleLayer> {
        let rotation = heading_to_rotation(self.heading);
        let mut layers = Vec::with_capacity(3);

        if self.selected {
            layers.push(StyleLayer::Icon(icon_layer(
                self.tables.icons.baseline(),
                rotation,
                HALO_Z_INDEX,
            )));
        }

        layers.push(StyleLayer::Icon(icon_layer(
            self.body_icon(),
            rotation,
            BODY_Z_INDEX,
        )));

        layers.push(StyleLayer::Text(self.label_layer()));
        layers
    }

    fn body_icon(&self) -> &IconRef {
        if self.is_station() {
            self.tables.icons.station()
        } else {
            self.tables.icons.for_status(self.status)
        }
    }

    fn label_layer(&self) -> TextLayer {
        let station = self.is_station();

        let text = if station {
            self.tables
                .stations
                .display_name(&self.identity)
                .unwrap_or(UNKNOWN_STATION_LABEL)
                .to_string()
        } else if self.identity.is_empty() {
            MISSING_IDENTITY_LABEL.to_string()
        } else {
            self.identity.clone()
        };

        let fill = if !self.label_color.is_empty() {
            self.label_color.clone()
        } else if station {
            STATION_LABEL_FILL.to_string()
        } else {
            VEHICLE_LABEL_FILL.to_string()
        };

        TextLayer {
            text,
            fill,
            font: if station { FontSize::Large } else { FontSize::Small },
            offset_y: LABEL_OFFSET_Y,
            align: TextAlign::Center,
        }
    }
}

fn icon_layer(image: &IconRef, rotation: f64, z_index: i32) -> IconLayer {
    IconLayer {
        image: image.clone(),
        rotation,
        z_index,
        rotate_with_view: true,
    }
}
