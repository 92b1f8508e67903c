//! Camera catalog
//!
//! The fixed set of gimbal cameras the console can view and steer, loaded
//! from the `[cameras]` configuration section.

use serde::{Deserialize, Serialize};
use skyglass_core::{CameraConfig, FeedConfig};
use std::net::Ipv4Addr;

/// One gimbal camera: a video stream plus the address commands go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFeed {
    /// Catalog identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Video stream URL
    pub url: String,
    /// Gimbal controller address
    pub ip: Ipv4Addr,
}

impl From<&FeedConfig> for CameraFeed {
    fn from(config: &FeedConfig) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            url: config.url.clone(),
            ip: config.ip,
        }
    }
}

/// Ordered camera list. Order is the grid order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraCatalog {
    feeds: Vec<CameraFeed>,
}

impl CameraCatalog {
    pub fn new(feeds: Vec<CameraFeed>) -> Self {
        Self { feeds }
    }

    /// The stock ten-camera catalog.
    pub fn standard() -> Self {
        Self::from_config(&CameraConfig::default())
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.feeds.iter().map(CameraFeed::from).collect())
    }

    pub fn feeds(&self) -> &[CameraFeed] {
        &self.feeds
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn first(&self) -> Option<&CameraFeed> {
        self.feeds.first()
    }

    /// Feed at a grid position.
    pub fn get(&self, index: usize) -> Option<&CameraFeed> {
        self.feeds.get(index)
    }

    pub fn by_ip(&self, ip: Ipv4Addr) -> Option<&CameraFeed> {
        self.feeds.iter().find(|feed| feed.ip == ip)
    }

    /// Stream URLs in grid order.
    pub fn urls(&self) -> Vec<String> {
        self.feeds.iter().map(|feed| feed.url.clone()).collect()
    }
}
