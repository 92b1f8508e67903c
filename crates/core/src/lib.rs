//! Core functionality for the SkyGlass ground-control station.
//!
//! This crate provides the configuration document, logging initialization
//! and error type shared by the map projection and camera console crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    CameraConfig, FeedConfig, GlassConfig, IconConfig, LoggingConfig, MapConfig, StationConfig,
};
pub use error::{CoreError, Result};
