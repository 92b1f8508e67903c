//! Camera console behaviour against a scripted message hub

use skyglass_gimbal::{
    CameraCatalog, CameraCommand, CameraConsole, DispatchOutcome, HoldControl, HubError,
    HubResponse, MessageHub, MessageSemantics, MissionMessage, Notification, ViewMode,
};
use skyglass_core::{CameraConfig, FeedConfig};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// Hub that records every message and replays scripted replies.
/// Unscripted sends are acknowledged.
#[derive(Default)]
struct ScriptedHub {
    sent: Mutex<Vec<MissionMessage>>,
    replies: Mutex<VecDeque<Result<HubResponse, HubError>>>,
}

impl ScriptedHub {
    fn reply_with(self, reply: Result<HubResponse, HubError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    fn sent(&self) -> Vec<MissionMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn last(&self) -> MissionMessage {
        self.sent().last().cloned().expect("no message sent")
    }
}

impl MessageHub for ScriptedHub {
    async fn send_message(&self, message: MissionMessage) -> Result<HubResponse, HubError> {
        self.sent.lock().unwrap().push(message);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HubResponse::with_message("ok")))
    }
}

fn console_with(
    hub: ScriptedHub,
) -> (CameraConsole<ScriptedHub>, UnboundedReceiver<Notification>) {
    let (tx, rx) = unbounded_channel();
    let console = CameraConsole::new(
        hub,
        CameraCatalog::standard(),
        Duration::from_millis(300),
        tx,
    )
    .unwrap();
    (console, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

const CAMERA_1: Ipv4Addr = Ipv4Addr::new(192, 168, 6, 121);
const CAMERA_3: Ipv4Addr = Ipv4Addr::new(192, 168, 6, 123);
const CAMERA_4: Ipv4Addr = Ipv4Addr::new(192, 168, 6, 124);

#[test]
fn test_empty_catalog_rejected() {
    let (tx, _rx) = unbounded_channel();
    let result = CameraConsole::new(
        ScriptedHub::default(),
        CameraCatalog::default(),
        Duration::from_millis(300),
        tx,
    );

    assert!(result.is_err());
}

#[tokio::test]
async fn test_from_config_uses_threshold_and_feeds() {
    let config = CameraConfig {
        long_press_ms: 800,
        feeds: vec![FeedConfig {
            id: 42,
            name: "Mast".to_string(),
            url: "http://10.0.0.5:8000/mast".to_string(),
            ip: Ipv4Addr::new(10, 0, 0, 5),
        }],
    };
    let (tx, _rx) = unbounded_channel();
    let mut console = CameraConsole::from_config(ScriptedHub::default(), &config, tx).unwrap();

    assert_eq!(console.long_press_threshold(), Duration::from_millis(800));
    assert_eq!(console.catalog().len(), 1);
    assert_eq!(console.selected(), Ipv4Addr::new(10, 0, 0, 5));

    let t0 = Instant::now();
    console.press(HoldControl::Up, t0);
    assert!(console.tick(t0 + Duration::from_millis(300)).await.is_empty());
    let engaged = console.tick(t0 + Duration::from_millis(800)).await;
    assert_eq!(engaged, vec![(HoldControl::Up, DispatchOutcome::Acknowledged)]);
}

#[test]
fn test_from_default_config_matches_standard() {
    let (tx, _rx) = unbounded_channel();
    let console =
        CameraConsole::from_config(ScriptedHub::default(), &CameraConfig::default(), tx).unwrap();

    assert_eq!(console.catalog(), &CameraCatalog::standard());
    assert_eq!(console.long_press_threshold(), Duration::from_millis(300));
}

#[test]
fn test_starts_on_first_camera() {
    let (console, _rx) = console_with(ScriptedHub::default());

    assert_eq!(console.selected(), CAMERA_1);
    assert_eq!(console.control_target(), CAMERA_1);
    assert!(matches!(console.view(), ViewMode::Single { feed } if feed.ip == CAMERA_1));
    assert!(!console.is_tracking());
    assert!(!console.is_recording());
}

#[tokio::test]
async fn test_acknowledged_command_is_silent() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    let outcome = console.home().await;

    assert_eq!(outcome, DispatchOutcome::Acknowledged);
    let sent = console.hub().last();
    assert_eq!(sent.kind, "X-Camera-MISSION");
    assert_eq!(sent.message, "home");
    assert_eq!(sent.ip, CAMERA_1);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_unacknowledged_command_raises_error() {
    let hub = ScriptedHub::default().reply_with(Ok(HubResponse::default()));
    let (mut console, mut rx) = console_with(hub);

    let outcome = console.send(CameraCommand::ZoomIn).await;

    assert_eq!(outcome, DispatchOutcome::Rejected);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::new("zoom_in Message Failed", MessageSemantics::Error)]
    );
}

#[tokio::test]
async fn test_hub_failure_raises_error() {
    let hub = ScriptedHub::default().reply_with(Err(HubError::Timeout));
    let (mut console, mut rx) = console_with(hub);

    let outcome = console.send(CameraCommand::Up).await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].semantics, MessageSemantics::Error);
    assert!(notifications[0].message.ends_with("Command is Failed"));
}

#[tokio::test]
async fn test_select_camera_retargets_everything() {
    let (mut console, _rx) = console_with(ScriptedHub::default());

    assert!(console.select_camera(CAMERA_3));
    console.send(CameraCommand::Left).await;

    assert_eq!(console.selected(), CAMERA_3);
    assert_eq!(console.control_target(), CAMERA_3);
    assert_eq!(console.hub().last().ip, CAMERA_3);
}

#[test]
fn test_unknown_camera_leaves_state() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    assert!(!console.select_camera(Ipv4Addr::new(10, 0, 0, 9)));

    assert_eq!(console.selected(), CAMERA_1);
    let notifications = drain(&mut rx);
    assert_eq!(notifications[0].semantics, MessageSemantics::Warning);
}

#[tokio::test]
async fn test_grid_tile_retargets_commands_only() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    console.select_all();
    match console.view() {
        ViewMode::Grid { urls } => assert_eq!(urls.len(), 10),
        other => panic!("expected grid, got {other:?}"),
    }
    assert_eq!(console.control_target(), CAMERA_1);

    assert!(console.select_tile(3));
    assert_eq!(
        drain(&mut rx),
        vec![Notification::new("192.168.6.124", MessageSemantics::Info)]
    );

    console.send(CameraCommand::ZoomOut).await;
    assert_eq!(console.hub().last().ip, CAMERA_4);
    assert_eq!(console.selected(), CAMERA_1);
}

#[test]
fn test_tile_selection_bounds() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    assert!(!console.select_tile(0));
    console.select_all();
    assert!(!console.select_tile(10));

    assert_eq!(console.control_target(), CAMERA_1);
    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .all(|n| n.semantics == MessageSemantics::Warning));
}

#[tokio::test]
async fn test_recording_flag_follows_request() {
    let hub = ScriptedHub::default().reply_with(Ok(HubResponse::with_message(false)));
    let (mut console, mut rx) = console_with(hub);

    let outcome = console.start_recording().await;
    assert_eq!(outcome, DispatchOutcome::Rejected);
    assert!(console.is_recording());
    assert_eq!(drain(&mut rx).len(), 1);

    console.stop_recording().await;
    assert!(!console.is_recording());
    assert_eq!(console.hub().last().message, "stop_record");
}

#[tokio::test]
async fn test_track_sends_truncated_pixels_to_selected() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    let outcome = console.track(640.9, 300.2).await;

    assert_eq!(outcome, DispatchOutcome::Acknowledged);
    assert!(console.is_tracking());
    let sent = console.hub().last();
    assert_eq!(sent.message, "track");
    assert_eq!((sent.x, sent.y), (Some(640), Some(300)));
    assert_eq!(sent.ip, CAMERA_1);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::new("Tracking Started", MessageSemantics::Success)]
    );
}

#[tokio::test]
async fn test_track_when_already_tracking() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    console.track(10.0, 10.0).await;
    drain(&mut rx);
    let outcome = console.track(20.0, 20.0).await;

    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert_eq!(console.hub().sent().len(), 1);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::new("Tracking is already enabled", MessageSemantics::Info)]
    );
}

#[tokio::test]
async fn test_track_rejected_keeps_tracking_off() {
    let hub = ScriptedHub::default().reply_with(Ok(HubResponse::with_message("")));
    let (mut console, mut rx) = console_with(hub);

    let outcome = console.track(1.0, 2.0).await;

    assert_eq!(outcome, DispatchOutcome::Rejected);
    assert!(!console.is_tracking());
    assert_eq!(
        drain(&mut rx),
        vec![Notification::new("Tracking Message Failed", MessageSemantics::Error)]
    );
}

#[tokio::test]
async fn test_track_skipped_in_grid() {
    let (mut console, mut rx) = console_with(ScriptedHub::default());

    console.select_all();
    let outcome = console.track(5.0, 5.0).await;

    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert!(console.hub().sent().is_empty());
    assert_eq!(drain(&mut rx)[0].semantics, MessageSemantics::Warning);
}

#[tokio::test]
async fn test_selecting_camera_resets_tracking() {
    let (mut console, _rx) = console_with(ScriptedHub::default());

    console.track(5.0, 5.0).await;
    assert!(console.is_tracking());
    console.select_camera(CAMERA_3);

    assert!(!console.is_tracking());
}

#[tokio::test]
async fn test_hold_engages_after_threshold_and_stops_on_release() {
    let (mut console, _rx) = console_with(ScriptedHub::default());
    let t0 = Instant::now();

    console.press(HoldControl::ZoomIn, t0);
    assert!(console.tick(t0 + Duration::from_millis(100)).await.is_empty());

    let engaged = console.tick(t0 + Duration::from_millis(300)).await;
    assert_eq!(engaged, vec![(HoldControl::ZoomIn, DispatchOutcome::Acknowledged)]);
    assert!(console.tick(t0 + Duration::from_millis(600)).await.is_empty());

    let stopped = console
        .release(HoldControl::ZoomIn, t0 + Duration::from_millis(700))
        .await;
    assert_eq!(stopped, Some(DispatchOutcome::Acknowledged));

    let names: Vec<String> = console
        .hub()
        .sent()
        .into_iter()
        .map(|message| message.message)
        .collect();
    assert_eq!(names, vec!["zoom_in", "zoom_stop"]);
}

#[tokio::test]
async fn test_short_press_only_stops() {
    let (mut console, _rx) = console_with(ScriptedHub::default());
    let t0 = Instant::now();

    console.press(HoldControl::Left, t0);
    let stopped = console
        .release(HoldControl::Left, t0 + Duration::from_millis(50))
        .await;

    assert_eq!(stopped, Some(DispatchOutcome::Acknowledged));
    let sent = console.hub().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "stop");
}

#[tokio::test]
async fn test_release_without_press_sends_nothing() {
    let (mut console, _rx) = console_with(ScriptedHub::default());

    let stopped = console.release(HoldControl::Down, Instant::now()).await;

    assert_eq!(stopped, None);
    assert!(console.hub().sent().is_empty());
}

#[tokio::test]
async fn test_holds_are_independent() {
    let (mut console, _rx) = console_with(ScriptedHub::default());
    let t0 = Instant::now();

    console.press(HoldControl::Up, t0);
    console.press(HoldControl::Right, t0 + Duration::from_millis(200));

    let engaged = console.tick(t0 + Duration::from_millis(350)).await;
    assert_eq!(engaged, vec![(HoldControl::Up, DispatchOutcome::Acknowledged)]);

    let engaged = console.tick(t0 + Duration::from_millis(500)).await;
    assert_eq!(engaged, vec![(HoldControl::Right, DispatchOutcome::Acknowledged)]);
}
