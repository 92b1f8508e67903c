//! Gimbal camera console
//!
//! Holds the operator's view of the camera fleet: which feed is shown, which
//! gimbal receives commands, and whether tracking or recording is active.
//! Commands are fire-and-forget from the operator's perspective: failures are
//! surfaced as notifications, never as errors.
//!
//! Two addresses are tracked separately. The *selected* feed is the one shown
//! in single view and is where tracking requests go. The *control target* is
//! where PTZ and recording commands go; in grid view it follows the last
//! clicked tile.

use crate::catalog::{CameraCatalog, CameraFeed};
use crate::command::{CameraCommand, HoldControl, MissionMessage};
use crate::hub::{MessageHub, MessageSemantics, Notification};
use crate::long_press::{LongPress, PressEvent, DEFAULT_THRESHOLD};
use skyglass_core::CameraConfig;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Console construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Catalog has no cameras to select
    #[error("Camera catalog is empty")]
    EmptyCatalog,
}

/// What the video area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// One camera, full size
    Single { feed: CameraFeed },
    /// Every camera as a tile
    Grid { urls: Vec<String> },
}

/// Result of handing a command to the hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Bridge acknowledged the command
    Acknowledged,
    /// Bridge replied without acknowledging
    Rejected,
    /// Hub failed to deliver
    Failed(String),
    /// Console state prevented sending
    Skipped,
}

impl DispatchOutcome {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, DispatchOutcome::Acknowledged)
    }
}

/// Camera console bound to a message hub
pub struct CameraConsole<H> {
    hub: H,
    catalog: CameraCatalog,
    view: ViewMode,
    selected: Ipv4Addr,
    control_target: Ipv4Addr,
    tracking: bool,
    recording: bool,
    holds: BTreeMap<HoldControl, LongPress>,
    notifications: UnboundedSender<Notification>,
}

impl<H: MessageHub> CameraConsole<H> {
    /// Create a console showing the first camera of the catalog.
    pub fn new(
        hub: H,
        catalog: CameraCatalog,
        long_press: Duration,
        notifications: UnboundedSender<Notification>,
    ) -> Result<Self, ConsoleError> {
        let first = catalog.first().cloned().ok_or(ConsoleError::EmptyCatalog)?;
        let holds = HoldControl::ALL
            .into_iter()
            .map(|control| (control, LongPress::new(long_press)))
            .collect();

        Ok(Self {
            hub,
            catalog,
            selected: first.ip,
            control_target: first.ip,
            view: ViewMode::Single { feed: first },
            tracking: false,
            recording: false,
            holds,
            notifications,
        })
    }

    /// Create a console from the `[cameras]` section: its feed catalog and
    /// long-press threshold.
    pub fn from_config(
        hub: H,
        config: &CameraConfig,
        notifications: UnboundedSender<Notification>,
    ) -> Result<Self, ConsoleError> {
        Self::new(
            hub,
            CameraCatalog::from_config(config),
            Duration::from_millis(config.long_press_ms),
            notifications,
        )
    }

    /// Hold duration before a press engages a control.
    pub fn long_press_threshold(&self) -> Duration {
        self.holds
            .values()
            .next()
            .map(LongPress::threshold)
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn catalog(&self) -> &CameraCatalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    /// Feed shown in single view; tracking target.
    pub fn selected(&self) -> Ipv4Addr {
        self.selected
    }

    /// Gimbal receiving PTZ and recording commands.
    pub fn control_target(&self) -> Ipv4Addr {
        self.control_target
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Show one camera and steer it. Unknown addresses leave state untouched.
    pub fn select_camera(&mut self, ip: Ipv4Addr) -> bool {
        let Some(feed) = self.catalog.by_ip(ip).cloned() else {
            self.notify(format!("Unknown camera {ip}"), MessageSemantics::Warning);
            return false;
        };

        info!(camera = %feed.name, %ip, "Camera selected");
        self.view = ViewMode::Single { feed };
        self.selected = ip;
        self.control_target = ip;
        self.tracking = false;
        true
    }

    /// Show every camera as a grid; commands go to the first camera until a
    /// tile is picked.
    pub fn select_all(&mut self) {
        if let Some(first) = self.catalog.first() {
            self.control_target = first.ip;
        }
        self.view = ViewMode::Grid {
            urls: self.catalog.urls(),
        };
        info!(cameras = self.catalog.len(), "Grid view");
    }

    /// Retarget commands to a grid tile.
    pub fn select_tile(&mut self, index: usize) -> bool {
        if !matches!(self.view, ViewMode::Grid { .. }) {
            self.notify("Tile selection requires the grid view", MessageSemantics::Warning);
            return false;
        }
        let Some(ip) = self.catalog.get(index).map(|feed| feed.ip) else {
            self.notify(format!("No camera at tile {index}"), MessageSemantics::Warning);
            return false;
        };

        self.control_target = ip;
        self.notify(ip.to_string(), MessageSemantics::Info);
        true
    }

    /// Send a command to the control target.
    pub async fn send(&mut self, command: CameraCommand) -> DispatchOutcome {
        let target = self.control_target;
        self.dispatch(command, target).await
    }

    pub async fn home(&mut self) -> DispatchOutcome {
        self.send(CameraCommand::Home).await
    }

    /// Start recording. The flag follows the operator's request even if the
    /// bridge does not acknowledge.
    pub async fn start_recording(&mut self) -> DispatchOutcome {
        let outcome = self.send(CameraCommand::StartRecord).await;
        self.recording = true;
        outcome
    }

    pub async fn stop_recording(&mut self) -> DispatchOutcome {
        let outcome = self.send(CameraCommand::StopRecord).await;
        self.recording = false;
        outcome
    }

    /// Ask the selected camera to track the object at a frame pixel.
    /// Coordinates are truncated to whole pixels.
    pub async fn track(&mut self, x: f64, y: f64) -> DispatchOutcome {
        if self.tracking {
            self.notify("Tracking is already enabled", MessageSemantics::Info);
            return DispatchOutcome::Skipped;
        }
        if !matches!(self.view, ViewMode::Single { .. }) {
            self.notify("Tracking requires a single camera view", MessageSemantics::Warning);
            return DispatchOutcome::Skipped;
        }

        let command = CameraCommand::Track {
            x: x.trunc() as i32,
            y: y.trunc() as i32,
        };
        let message = MissionMessage::new(&command, self.selected);

        match self.hub.send_message(message).await {
            Ok(reply) if reply.is_acknowledged() => {
                self.tracking = true;
                info!(ip = %self.selected, ?command, "Tracking started");
                self.notify("Tracking Started", MessageSemantics::Success);
                DispatchOutcome::Acknowledged
            }
            Ok(_) => {
                warn!(ip = %self.selected, "Tracking request not acknowledged");
                self.notify("Tracking Message Failed", MessageSemantics::Error);
                DispatchOutcome::Rejected
            }
            Err(e) => {
                warn!(ip = %self.selected, error = %e, "Tracking request failed");
                self.notify(format!("{e} Command is Failed"), MessageSemantics::Error);
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Begin holding a control.
    pub fn press(&mut self, control: HoldControl, now: Instant) {
        if let Some(gesture) = self.holds.get_mut(&control) {
            gesture.press(now);
        }
    }

    /// Send the engage command of every control whose hold just crossed the
    /// threshold.
    pub async fn tick(&mut self, now: Instant) -> Vec<(HoldControl, DispatchOutcome)> {
        let engaged: Vec<HoldControl> = self
            .holds
            .iter_mut()
            .filter_map(|(control, gesture)| {
                (gesture.poll(now) == Some(PressEvent::LongPress)).then_some(*control)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(engaged.len());
        for control in engaged {
            let outcome = self.send(control.engage()).await;
            outcomes.push((control, outcome));
        }
        outcomes
    }

    /// Let go of a control, sending its stop command if it was pressed.
    pub async fn release(&mut self, control: HoldControl, now: Instant) -> Option<DispatchOutcome> {
        self.holds
            .get_mut(&control)
            .and_then(|gesture| gesture.release(now))?;

        Some(self.send(control.release()).await)
    }

    async fn dispatch(&self, command: CameraCommand, target: Ipv4Addr) -> DispatchOutcome {
        debug!(%command, ip = %target, "Dispatching camera command");
        let message = MissionMessage::new(&command, target);

        match self.hub.send_message(message).await {
            Ok(reply) if reply.is_acknowledged() => DispatchOutcome::Acknowledged,
            Ok(_) => {
                warn!(%command, ip = %target, "Camera command not acknowledged");
                self.notify(format!("{command} Message Failed"), MessageSemantics::Error);
                DispatchOutcome::Rejected
            }
            Err(e) => {
                warn!(%command, ip = %target, error = %e, "Camera command failed");
                self.notify(format!("{e} Command is Failed"), MessageSemantics::Error);
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    fn notify(&self, message: impl Into<String>, semantics: MessageSemantics) {
        if self.notifications.send(Notification::new(message, semantics)).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}
