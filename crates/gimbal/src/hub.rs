//! Message hub contract
//!
//! The console never talks to a transport directly. It hands mission messages
//! to a [`MessageHub`] and inspects the reply; the hub implementation (WebSocket,
//! HTTP bridge, test double) lives outside this crate.

use crate::command::MissionMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

/// Hub errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    /// Transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No reply within the hub's deadline
    #[error("Hub request timed out")]
    Timeout,

    /// Hub connection closed
    #[error("Hub connection closed")]
    Closed,
}

/// Outbound request/response channel to the gimbal bridge.
pub trait MessageHub {
    /// Send one message and wait for the bridge's reply.
    fn send_message(
        &self,
        message: MissionMessage,
    ) -> impl Future<Output = Result<HubResponse, HubError>> + Send;
}

/// Reply from the gimbal bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HubResponse {
    #[serde(default)]
    pub body: Option<ResponseBody>,
}

/// Reply payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub message: Value,
}

impl HubResponse {
    /// Reply whose body carries `message`.
    pub fn with_message(message: impl Into<Value>) -> Self {
        Self {
            body: Some(ResponseBody {
                message: message.into(),
            }),
        }
    }

    /// The bridge accepted the command: `body.message` is present and truthy.
    pub fn is_acknowledged(&self) -> bool {
        self.body
            .as_ref()
            .map(|body| is_truthy(&body.message))
            .unwrap_or(false)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Operator-facing message semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSemantics {
    Info,
    Success,
    Warning,
    Error,
}

/// Operator notification raised by the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub semantics: MessageSemantics,
}

impl Notification {
    pub fn new(message: impl Into<String>, semantics: MessageSemantics) -> Self {
        Self {
            message: message.into(),
            semantics,
        }
    }
}
