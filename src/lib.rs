// Parlor - a real-time chat room client for Rust
//
// This library keeps one reconnecting WebSocket connection per room and routes
// the server's chat events to a presentation layer of your choosing.

// Re-export core functionality
pub use parlor_websocket::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use parlor_config;

#[cfg(feature = "log")]
pub use parlor_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BufferedView,
        ChatError,
        ChatResult,
        ConnectionHandle,
        ConnectionManager,
        ConnectionState,
        Connector,
        EventRouter,
        InboundEvent,
        ManagerConfig,
        Message,
        OutboundMessage,
        Presentation,
        RoomId,
        TungsteniteConnector,
    };
}
