//! Drawable style primitives handed to the map renderer.
//!
//! Layers are logical descriptions only: the renderer resolves image
//! references to assets and owns all screen-space transforms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical label offset below the icon anchor, in renderer units.
pub const LABEL_OFFSET_Y: f64 = 24.0;

/// Z-order of the selection halo.
pub const HALO_Z_INDEX: i32 = 0;

/// Z-order of the body icon.
pub const BODY_Z_INDEX: i32 = 1;

/// Reference to an image asset, resolved by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IconRef {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// Font size class of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    /// Generic vehicles
    Small,
    /// Reserved stations
    Large,
}

impl FontSize {
    /// CSS font shorthand understood by canvas-style renderers.
    pub fn css(&self) -> &'static str {
        match self {
            FontSize::Small => "12px sans-serif",
            FontSize::Large => "14px sans-serif",
        }
    }
}

/// Horizontal alignment of a label around its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Rotated image drawn at the entity position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconLayer {
    pub image: IconRef,
    /// Clockwise rotation in radians.
    pub rotation: f64,
    pub z_index: i32,
    /// Icon keeps its bearing when the map view rotates.
    pub rotate_with_view: bool,
}

/// Text drawn below the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub text: String,
    pub fill: String,
    pub font: FontSize,
    pub offset_y: f64,
    pub align: TextAlign,
}

/// One drawable primitive of an entity's on-screen representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleLayer {
    Icon(IconLayer),
    Text(TextLayer),
}

impl StyleLayer {
    pub fn as_icon(&self) -> Option<&IconLayer> {
        match self {
            StyleLayer::Icon(icon) => Some(icon),
            StyleLayer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            StyleLayer::Text(text) => Some(text),
            StyleLayer::Icon(_) => None,
        }
    }
}

/// Reduce a compass bearing into `[0, 360)`, negative inputs included.
pub fn normalize_heading(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Icon rotation for a compass bearing.
pub fn heading_to_rotation(degrees: f64) -> f64 {
    normalize_heading(degrees).to_radians()
}
