//! Camera command definitions
//!
//! This module defines the pan/tilt/zoom, recording and tracking commands a
//! gimbal understands, and the mission message that carries them over the
//! message hub.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Message type tag the gimbal bridge listens for.
pub const MISSION_MESSAGE_TYPE: &str = "X-Camera-MISSION";

/// Single gimbal command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraCommand {
    /// Start zooming in
    ZoomIn,
    /// Start zooming out
    ZoomOut,
    /// Stop any zoom motion
    ZoomStop,
    /// Start tilting up
    Up,
    /// Start tilting down
    Down,
    /// Start panning left
    Left,
    /// Start panning right
    Right,
    /// Stop any pan/tilt motion
    Stop,
    /// Return to the home orientation
    Home,
    /// Start recording on the camera
    StartRecord,
    /// Stop recording on the camera
    StopRecord,
    /// Lock tracking onto the object at a pixel of the video frame
    Track {
        /// Horizontal pixel offset from the frame's left edge
        x: i32,
        /// Vertical pixel offset from the frame's top edge
        y: i32,
    },
}

impl CameraCommand {
    /// Wire name carried in the mission message
    pub fn name(&self) -> &'static str {
        match self {
            CameraCommand::ZoomIn => "zoom_in",
            CameraCommand::ZoomOut => "zoom_out",
            CameraCommand::ZoomStop => "zoom_stop",
            CameraCommand::Up => "up",
            CameraCommand::Down => "down",
            CameraCommand::Left => "left",
            CameraCommand::Right => "right",
            CameraCommand::Stop => "stop",
            CameraCommand::Home => "home",
            CameraCommand::StartRecord => "start_record",
            CameraCommand::StopRecord => "stop_record",
            CameraCommand::Track { .. } => "track",
        }
    }

    /// Pixel coordinates for commands that target a point in the frame
    pub fn coordinates(&self) -> Option<(i32, i32)> {
        match self {
            CameraCommand::Track { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

impl fmt::Display for CameraCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control that moves the gimbal only while held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HoldControl {
    /// Zoom in while held
    ZoomIn,
    /// Zoom out while held
    ZoomOut,
    /// Tilt up while held
    Up,
    /// Tilt down while held
    Down,
    /// Pan left while held
    Left,
    /// Pan right while held
    Right,
}

impl HoldControl {
    /// Every hold control
    pub const ALL: [HoldControl; 6] = [
        HoldControl::ZoomIn,
        HoldControl::ZoomOut,
        HoldControl::Up,
        HoldControl::Down,
        HoldControl::Left,
        HoldControl::Right,
    ];

    /// Command sent once the hold is recognized
    pub fn engage(&self) -> CameraCommand {
        match self {
            HoldControl::ZoomIn => CameraCommand::ZoomIn,
            HoldControl::ZoomOut => CameraCommand::ZoomOut,
            HoldControl::Up => CameraCommand::Up,
            HoldControl::Down => CameraCommand::Down,
            HoldControl::Left => CameraCommand::Left,
            HoldControl::Right => CameraCommand::Right,
        }
    }

    /// Command sent when the control is let go
    pub fn release(&self) -> CameraCommand {
        match self {
            HoldControl::ZoomIn | HoldControl::ZoomOut => CameraCommand::ZoomStop,
            HoldControl::Up | HoldControl::Down | HoldControl::Left | HoldControl::Right => {
                CameraCommand::Stop
            }
        }
    }
}

/// Mission message as sent over the hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionMessage {
    /// Message type tag, always [`MISSION_MESSAGE_TYPE`]
    #[serde(rename = "type")]
    pub kind: String,
    /// Command wire name
    pub message: String,
    /// Target gimbal address
    pub ip: Ipv4Addr,
    /// Horizontal pixel (tracking only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Vertical pixel (tracking only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl MissionMessage {
    /// Build the message carrying `command` to the gimbal at `ip`
    pub fn new(command: &CameraCommand, ip: Ipv4Addr) -> Self {
        let coordinates = command.coordinates();
        Self {
            kind: MISSION_MESSAGE_TYPE.to_string(),
            message: command.name().to_string(),
            ip,
            x: coordinates.map(|(x, _)| x),
            y: coordinates.map(|(_, y)| y),
        }
    }
}
