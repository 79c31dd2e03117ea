//! WebSocket frame types exchanged between the transport and the client.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Frame type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Text frame
    Text,
    /// Binary frame
    Binary,
    /// Close frame
    Close,
}

/// A WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The frame type
    pub message_type: MessageType,
    /// The frame payload
    pub payload: Bytes,
}

impl Message {
    /// Create a new text frame.
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            message_type: MessageType::Text,
            payload: Bytes::from(text.into()),
        }
    }

    /// Create a new binary frame.
    pub fn binary<B: Into<Bytes>>(data: B) -> Self {
        Self {
            message_type: MessageType::Binary,
            payload: data.into(),
        }
    }

    /// Create a close frame.
    pub fn close() -> Self {
        Self {
            message_type: MessageType::Close,
            payload: Bytes::new(),
        }
    }

    /// Create a JSON text frame from a serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(value)?;
        Ok(Self::text(json))
    }

    /// Get the payload as a string, for text frames.
    pub fn as_text(&self) -> Option<&str> {
        if self.message_type == MessageType::Text {
            std::str::from_utf8(&self.payload).ok()
        } else {
            None
        }
    }

    /// Get the frame payload as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Check if this is a close frame.
    pub fn is_close(&self) -> bool {
        self.message_type == MessageType::Close
    }

    /// Convert a raw tungstenite frame into a data frame.
    ///
    /// Control frames other than close are answered by tungstenite itself and
    /// yield `None`.
    pub fn from_raw(raw: tungstenite::Message) -> Option<Self> {
        match raw {
            tungstenite::Message::Text(text) => Some(Self::text(text.as_str())),
            tungstenite::Message::Binary(data) => Some(Self::binary(data)),
            tungstenite::Message::Close(_) => Some(Self::close()),
            tungstenite::Message::Ping(_)
            | tungstenite::Message::Pong(_)
            | tungstenite::Message::Frame(_) => None,
        }
    }
}

impl From<Message> for tungstenite::Message {
    fn from(msg: Message) -> Self {
        match msg.message_type {
            MessageType::Text => tungstenite::Message::Text(
                String::from_utf8_lossy(&msg.payload).into_owned().into(),
            ),
            MessageType::Binary => tungstenite::Message::Binary(msg.payload),
            MessageType::Close => tungstenite::Message::Close(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_frame_is_text() {
        let frame = Message::json(&serde_json::json!({"message": "hi"})).unwrap();
        assert_eq!(frame.as_text(), Some(r#"{"message":"hi"}"#));
    }

    #[test]
    fn test_binary_has_no_text_view() {
        let frame = Message::binary(b"{}".to_vec());
        assert!(frame.as_text().is_none());
        assert_eq!(frame.as_bytes(), b"{}");
    }

    #[test]
    fn test_control_frames_are_filtered() {
        assert!(Message::from_raw(tungstenite::Message::Ping(Bytes::new())).is_none());
        assert!(Message::from_raw(tungstenite::Message::Pong(Bytes::new())).is_none());
        assert!(Message::from_raw(tungstenite::Message::Close(None))
            .unwrap()
            .is_close());
    }
}
