//! Renderer adapter for tracked entities.
//!
//! The map renderer never sees a [`TrackedEntity`] directly. It receives a
//! [`MapFeature`]: identity, placement and the already-derived layers, built
//! on demand from anything [`Drawable`].

use crate::entity::TrackedEntity;
use crate::style::StyleLayer;
use crate::track::GeoPoint;
use serde::{Deserialize, Serialize};

/// Anything the map can draw.
pub trait Drawable {
    /// Stable feature identifier
    fn feature_id(&self) -> &str;

    /// Current placement, if known
    fn position(&self) -> Option<GeoPoint>;

    /// Ordered style layers
    fn layers(&self) -> &[StyleLayer];
}

impl Drawable for TrackedEntity {
    fn feature_id(&self) -> &str {
        self.identity()
    }

    fn position(&self) -> Option<GeoPoint> {
        None
    }

    fn layers(&self) -> &[StyleLayer] {
        self.current_style()
    }
}

/// Feature description handed to the renderer on each redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeature {
    /// Feature identifier
    pub id: String,

    /// Placement (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,

    /// Layers, bottom first
    pub layers: Vec<StyleLayer>,
}

impl MapFeature {
    /// Create from a drawable
    pub fn from_drawable<T: Drawable>(drawable: &T) -> Self {
        Self {
            id: drawable.feature_id().to_string(),
            position: drawable.position(),
            layers: drawable.layers().to_vec(),
        }
    }

    /// Serialize as one JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
