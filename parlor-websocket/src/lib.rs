//! # Parlor WebSocket
//!
//! Chat room client core for Parlor, built on tokio-tungstenite.
//!
//! ## Features
//!
//! - One connection per room, reopened after a fixed delay whenever it closes
//! - Explicit connection state machine with a single transition function
//! - Inbound event routing to a pluggable presentation layer
//! - Best-effort sends gated on the connection state
//!
//! ## Example
//!
//! ```rust,no_run
//! use parlor_websocket::{
//!     BufferedView, ConnectionManager, EventRouter, ManagerConfig, OutboundMessage, RoomId,
//!     TungsteniteConnector,
//! };
//!
//! # async fn example() -> Result<(), parlor_websocket::ChatError> {
//! let manager = ConnectionManager::new(TungsteniteConnector::new(), ManagerConfig::default())?;
//! let (handle, mut frames) = manager.open(RoomId::new("lobby"));
//!
//! handle.send(&OutboundMessage::new("hello")?);
//!
//! let mut view = BufferedView::new();
//! EventRouter::new().run(&mut frames, &mut view).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod connection;
mod error;
mod manager;
mod message;
mod presentation;
mod protocol;
mod room;
mod router;
mod state;

pub use connection::{Connector, LinkPeer, TransportLink, TransportSignal, TungsteniteConnector};
pub use error::{ChatError, ChatResult};
pub use manager::{ConnectionHandle, ConnectionManager, FrameReceiver, ManagerConfig};
pub use message::{Message, MessageType};
pub use presentation::{BufferedView, Presentation, Roster};
pub use protocol::{EventKind, InboundEvent, OutboundMessage};
pub use room::{RoomEndpoint, RoomId};
pub use router::EventRouter;
pub use state::{
    Action, ConnectionState, ConnectionStateMachine, TransportEvent, DEFAULT_RECONNECT_DELAY,
};

// Re-export commonly used types from tungstenite
pub use tungstenite::Message as RawMessage;
