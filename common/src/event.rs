use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::room::RoomId;

/// Status string the server uses to announce that a room's history was wiped.
pub const HISTORY_CLEARED: &str = "cleared the chat history";

const KNOWN_TYPES: [&str; 5] = ["message", "typing", "status", "switch-room", "heartbeat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Online => "online",
            Presence::Offline => "offline",
        }
    }
}

/// Protocol event exchanged with the chat server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message {
        id: Option<String>,
        user: String,
        room: RoomId,
        text: String,
    },
    Typing {
        user: String,
    },
    Status {
        user: String,
        presence: Presence,
    },
    SwitchRoom {
        room: RoomId,
    },
    Heartbeat,
    HistoryCleared {
        room: RoomId,
        user: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid json: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("missing \"type\" field")]
    MissingType,
    #[error("unknown event type \"{0}\"")]
    UnknownType(String),
    #[error("malformed {kind} event: {reason}")]
    Malformed { kind: String, reason: String },
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

// Shape of the JSON objects on the socket. `Event` is the validated view of it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum WireEvent {
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        user: String,
        room: String,
        message: String,
    },
    Typing {
        user: String,
    },
    Status {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
        status: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },
    SwitchRoom {
        room: String,
    },
    Heartbeat {},
}

fn malformed(kind: &str, reason: &str) -> EventError {
    EventError::Malformed {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}

fn require(kind: &str, field: &str, value: String) -> Result<String, EventError> {
    if value.trim().is_empty() {
        return Err(malformed(kind, &format!("\"{field}\" must not be empty")));
    }

    Ok(value)
}

fn check_event(wire: WireEvent) -> Result<Event, EventError> {
    let event = match wire {
        WireEvent::Message {
            id,
            user,
            room,
            message,
        } => Event::Message {
            id,
            user: require("message", "user", user)?,
            room: RoomId::new(require("message", "room", room)?),
            text: message,
        },
        WireEvent::Typing { user } => Event::Typing {
            user: require("typing", "user", user)?,
        },
        WireEvent::Status { user, status, room } => match status.as_str() {
            "online" | "offline" => {
                let user = user.ok_or_else(|| malformed("status", "\"user\" required"))?;
                let presence = if status == "online" {
                    Presence::Online
                } else {
                    Presence::Offline
                };

                Event::Status {
                    user: require("status", "user", user)?,
                    presence,
                }
            }
            HISTORY_CLEARED => {
                let room = room.ok_or_else(|| malformed("status", "\"room\" required"))?;

                Event::HistoryCleared {
                    room: RoomId::new(require("status", "room", room)?),
                    user,
                }
            }
            other => {
                return Err(malformed("status", &format!("unknown status \"{other}\"")));
            }
        },
        WireEvent::SwitchRoom { room } => Event::SwitchRoom {
            room: RoomId::new(require("switch-room", "room", room)?),
        },
        WireEvent::Heartbeat {} => Event::Heartbeat,
    };

    Ok(event)
}

impl From<&Event> for WireEvent {
    fn from(event: &Event) -> Self {
        match event.clone() {
            Event::Message {
                id,
                user,
                room,
                text,
            } => WireEvent::Message {
                id,
                user,
                room: room.as_str().to_string(),
                message: text,
            },
            Event::Typing { user } => WireEvent::Typing { user },
            Event::Status { user, presence } => WireEvent::Status {
                user: Some(user),
                status: presence.as_str().to_string(),
                room: None,
            },
            Event::SwitchRoom { room } => WireEvent::SwitchRoom {
                room: room.as_str().to_string(),
            },
            Event::Heartbeat => WireEvent::Heartbeat {},
            Event::HistoryCleared { room, user } => WireEvent::Status {
                user,
                status: HISTORY_CLEARED.to_string(),
                room: Some(room.as_str().to_string()),
            },
        }
    }
}

impl Event {
    pub fn message(user: &str, room: &RoomId, text: &str) -> Self {
        Event::Message {
            id: None,
            user: user.to_string(),
            room: room.clone(),
            text: text.to_string(),
        }
    }

    pub fn typing(user: &str) -> Self {
        Event::Typing {
            user: user.to_string(),
        }
    }

    pub fn online(user: &str) -> Self {
        Event::Status {
            user: user.to_string(),
            presence: Presence::Online,
        }
    }

    pub fn switch_room(room: &RoomId) -> Self {
        Event::SwitchRoom { room: room.clone() }
    }

    /// Wire name of the event, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Message { .. } => "message",
            Event::Typing { .. } => "typing",
            Event::Status { .. } => "status",
            Event::SwitchRoom { .. } => "switch-room",
            Event::Heartbeat => "heartbeat",
            Event::HistoryCleared { .. } => "history-cleared",
        }
    }

    /// Parses one inbound payload. The discriminant is checked before the
    /// body so that unknown types can be told apart from broken ones.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(EventError::InvalidJson)?;

        let kind = match value.get("type") {
            Some(serde_json::Value::String(kind)) => kind.clone(),
            Some(_) => return Err(malformed("event", "\"type\" must be a string")),
            None => return Err(EventError::MissingType),
        };

        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Err(EventError::UnknownType(kind));
        }

        let wire: WireEvent = serde_json::from_value(value).map_err(|e| EventError::Malformed {
            kind: kind.clone(),
            reason: e.to_string(),
        })?;

        check_event(wire)
    }

    pub fn to_json(&self) -> Result<String, EventError> {
        serde_json::to_string(&WireEvent::from(self)).map_err(EventError::Encode)
    }

    pub fn to_message(&self) -> Result<tungstenite::Message, EventError> {
        Ok(tungstenite::Message::text(self.to_json()?))
    }
}

impl FromStr for Event {
    type Err = EventError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Event::parse(raw)
    }
}
