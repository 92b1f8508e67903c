//! Gimbal Console - PTZ camera control for SkyGlass
//!
//! This crate provides the camera side of the ground station:
//! - Camera catalog loaded from configuration
//! - Pan/tilt/zoom, recording and tracking command definitions
//! - Mission message wire format and the message hub contract
//! - Long-press recognition for hold-to-move controls
//! - Console state: single/grid view, control target, tracking, recording
//!
//! # Command Flow
//!
//! 1. Operator input reaches the `CameraConsole` (selection, button, hold)
//! 2. The console builds a `MissionMessage` for the right gimbal address
//! 3. The `MessageHub` delivers it and returns the bridge's reply
//! 4. Unacknowledged or failed commands raise a `Notification`
//!
//! # Examples
//!
//! ```no_run
//! use skyglass_gimbal::{
//!     CameraCatalog, CameraCommand, CameraConsole, HubError, HubResponse, MessageHub,
//!     MissionMessage,
//! };
//! use std::time::Duration;
//!
//! struct Bridge;
//!
//! impl MessageHub for Bridge {
//!     async fn send_message(&self, _message: MissionMessage) -> Result<HubResponse, HubError> {
//!         Ok(HubResponse::with_message("ok"))
//!     }
//! }
//!
//! # async fn run() {
//! let (notify_tx, _notify_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut console = CameraConsole::new(
//!     Bridge,
//!     CameraCatalog::standard(),
//!     Duration::from_millis(300),
//!     notify_tx,
//! )
//! .unwrap();
//!
//! console.send(CameraCommand::Home).await;
//! # }
//! ```

pub mod catalog;
pub mod command;
pub mod console;
pub mod hub;
pub mod long_press;

pub use catalog::{CameraCatalog, CameraFeed};
pub use command::{CameraCommand, HoldControl, MissionMessage, MISSION_MESSAGE_TYPE};
pub use console::{CameraConsole, ConsoleError, DispatchOutcome, ViewMode};
pub use hub::{HubError, HubResponse, MessageHub, MessageSemantics, Notification, ResponseBody};
pub use long_press::{LongPress, PressEvent, PressState, DEFAULT_THRESHOLD};
