//! Wire events exchanged with display/control clients.
//!
//! Outbound frames have the shape `{"type": ..., "data": ..., "timestamp": ...}`.
//! Inbound frames are either `{"type": "register", "data": {"role": ...}}` or
//! `{"type": "trigger"}`; anything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Session state changed
    Status,
    /// Countdown tick
    Countdown,
    /// Preview of a new photo is available
    #[serde(rename = "photo_ready")]
    PhotoReady,
    /// Activity log entry
    Log,
    /// Camera and disk information
    System,
    /// Session-visible error
    Error,
}

impl EventType {
    /// Wire name of the type
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Countdown => "countdown",
            Self::PhotoReady => "photo_ready",
            Self::Log => "log",
            Self::System => "system",
            Self::Error => "error",
        }
    }
}

/// Event broadcast to every connected client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Type-dependent payload
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Event {
    /// Create an event stamped with the current time
    #[must_use]
    pub fn new(event_type: EventType, data: Value) -> Self {
        Self {
            event_type,
            data,
            timestamp: now_millis(),
        }
    }

    /// Create an event from any serializable payload
    ///
    /// Payloads that fail to serialize become `null`.
    #[must_use]
    pub fn from_payload<T: Serialize>(event_type: EventType, payload: &T) -> Self {
        Self::new(
            event_type,
            serde_json::to_value(payload).unwrap_or(Value::Null),
        )
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Milliseconds since the Unix epoch
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Control message received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Client announces its role (display, remote, admin, ...)
    Register {
        /// Free-form role tag
        role: String,
    },
    /// Remote trigger request
    Trigger,
}

#[derive(Deserialize)]
struct InboundFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl ClientMessage {
    /// Parse an inbound text frame.
    ///
    /// Returns `None` for malformed JSON, unknown types and `register`
    /// frames without a string role.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let frame: InboundFrame = serde_json::from_str(text).ok()?;
        match frame.kind.as_str() {
            "register" => frame
                .data
                .get("role")
                .and_then(Value::as_str)
                .map(|role| Self::Register {
                    role: role.to_string(),
                }),
            "trigger" => Some(Self::Trigger),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let event = Event {
            event_type: EventType::Countdown,
            data: json!({"remaining": 3, "total": 3}),
            timestamp: 1_700_000_000_000,
        };
        let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "countdown");
        assert_eq!(value["data"]["remaining"], 3);
        assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_photo_ready_type_name() {
        let json = serde_json::to_string(&EventType::PhotoReady).unwrap();
        assert_eq!(json, "\"photo_ready\"");
        assert_eq!(EventType::PhotoReady.as_str(), "photo_ready");
    }

    #[test]
    fn test_null_data_is_omitted() {
        let event = Event::new(EventType::Status, Value::Null);
        let json = event.to_json().unwrap();
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_parse_register() {
        let msg = ClientMessage::parse(r#"{"type":"register","data":{"role":"display"}}"#);
        assert_eq!(
            msg,
            Some(ClientMessage::Register {
                role: "display".to_string()
            })
        );
    }

    #[test]
    fn test_parse_trigger_with_and_without_data() {
        assert_eq!(
            ClientMessage::parse(r#"{"type":"trigger"}"#),
            Some(ClientMessage::Trigger)
        );
        assert_eq!(
            ClientMessage::parse(r#"{"type":"trigger","data":{}}"#),
            Some(ClientMessage::Trigger)
        );
    }

    #[test]
    fn test_parse_ignores_unknown_and_malformed() {
        assert_eq!(ClientMessage::parse(r#"{"type":"dance"}"#), None);
        assert_eq!(ClientMessage::parse("not json"), None);
        assert_eq!(
            ClientMessage::parse(r#"{"type":"register","data":{"role":5}}"#),
            None
        );
        assert_eq!(ClientMessage::parse(r#"{"data":{}}"#), None);
    }
}
