//! Room identifiers and the socket endpoint derived from them.

use crate::error::{ChatError, ChatResult};
use std::fmt;
use url::Url;

/// Path segment every chat room endpoint lives under.
const CHAT_SEGMENT: &str = "chat";

/// Opaque room identifier, fixed for the lifetime of a client session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room identifier.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Resolve a room picker label such as `"lobby (3 online)"` to its room.
    ///
    /// Everything before the first `" ("` is the room name.
    pub fn from_selection(label: &str) -> Self {
        let name = label.split(" (").next().unwrap_or(label);
        Self::new(name)
    }

    /// The identifier as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative page path for this room, `chat/<room>/`.
    pub fn page_path(&self) -> String {
        format!("{}/{}/", CHAT_SEGMENT, self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Builds per-room socket URLs of the form `<server>/<prefix>/chat/<room>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEndpoint {
    base: Url,
    prefix: Vec<String>,
}

impl RoomEndpoint {
    /// Create an endpoint builder.
    ///
    /// `server` supplies scheme and host (`ws://` or `wss://`); `prefix` is the
    /// socket route prefix, for example `ws`.
    pub fn new(server: &str, prefix: &str) -> ChatResult<Self> {
        let base = Url::parse(server).map_err(|e| ChatError::InvalidEndpoint(e.to_string()))?;

        if !matches!(base.scheme(), "ws" | "wss") {
            return Err(ChatError::InvalidEndpoint(format!(
                "unsupported scheme `{}`, expected ws or wss",
                base.scheme()
            )));
        }
        if base.cannot_be_a_base() {
            return Err(ChatError::InvalidEndpoint(format!(
                "`{server}` cannot carry a path"
            )));
        }

        let prefix = prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { base, prefix })
    }

    /// Socket URL for a room.
    ///
    /// The room identifier becomes a single path segment; characters that are
    /// not allowed in a segment are percent-encoded.
    pub fn for_room(&self, room: &RoomId) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Always Ok: `new` rejected cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(&self.prefix)
                .push(CHAT_SEGMENT)
                .push(room.as_str())
                .push("");
        }
        url
    }
}
