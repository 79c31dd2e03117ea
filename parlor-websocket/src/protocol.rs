//! Chat wire protocol: JSON payloads carried in text frames.
//!
//! Inbound payloads are tagged on a `type` field:
//!
//! ```json
//! {"type": "chat_message", "user": "alice", "message": "hi"}
//! {"type": "user_list", "users": ["alice", "bob"]}
//! {"type": "user_join", "user": "carol"}
//! {"type": "user_leave", "user": "carol"}
//! ```
//!
//! Outbound payloads carry only the text: `{"message": "hi"}`.

use crate::error::{ChatError, ChatResult};
use crate::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminant of an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A user posted a message
    ChatMessage,
    /// Snapshot of the users currently online
    UserList,
    /// A user entered the room
    UserJoin,
    /// A user left the room
    UserLeave,
}

impl EventKind {
    /// Look up the kind for a wire `type` value.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "chat_message" => Some(EventKind::ChatMessage),
            "user_list" => Some(EventKind::UserList),
            "user_join" => Some(EventKind::UserJoin),
            "user_leave" => Some(EventKind::UserLeave),
            _ => None,
        }
    }

    /// Wire `type` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ChatMessage => "chat_message",
            EventKind::UserList => "user_list",
            EventKind::UserJoin => "user_join",
            EventKind::UserLeave => "user_leave",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A chat line
    ChatMessage {
        /// Author
        user: String,
        /// Message body
        message: String,
    },
    /// Users currently online; may contain duplicates
    UserList {
        /// User names in server order
        users: Vec<String>,
    },
    /// A user joined
    UserJoin {
        /// User name
        user: String,
    },
    /// A user left
    UserLeave {
        /// User name
        user: String,
    },
}

impl InboundEvent {
    /// Decode an inbound payload.
    ///
    /// Invalid JSON, a missing `type`, or fields that do not match the tag are
    /// reported as [`ChatError::MalformedFrame`]. A well-formed object with an
    /// unrecognised `type` is reported as [`ChatError::UnknownEventType`].
    pub fn from_slice(payload: &[u8]) -> ChatResult<Self> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| ChatError::MalformedFrame(e.to_string()))?;

        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ChatError::MalformedFrame("missing string field `type`".to_string()))?;

        if EventKind::from_tag(tag).is_none() {
            return Err(ChatError::UnknownEventType(tag.to_string()));
        }

        serde_json::from_value(value).map_err(|e| ChatError::MalformedFrame(e.to_string()))
    }

    /// Decode an inbound payload from text.
    pub fn from_text(text: &str) -> ChatResult<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// The discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::ChatMessage { .. } => EventKind::ChatMessage,
            InboundEvent::UserList { .. } => EventKind::UserList,
            InboundEvent::UserJoin { .. } => EventKind::UserJoin,
            InboundEvent::UserLeave { .. } => EventKind::UserLeave,
        }
    }
}

/// A message typed by the local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    message: String,
}

impl OutboundMessage {
    /// Build a message from user input.
    ///
    /// Input that is empty after trimming is rejected; otherwise the text is
    /// sent as typed.
    pub fn new<S: Into<String>>(text: S) -> ChatResult<Self> {
        let message = text.into();
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(Self { message })
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.message
    }

    /// Encode as the outbound text frame `{"message": "<text>"}`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Serialization`] if JSON encoding fails.
    pub fn to_frame(&self) -> ChatResult<Message> {
        Ok(Message::json(self)?)
    }
}
