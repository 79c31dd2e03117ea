//! Connection lifecycle state machine.
//!
//! Every state change goes through [`ConnectionStateMachine::transition`], which
//! returns the action the owner has to carry out next. The machine performs no
//! I/O itself.

use std::fmt;
use std::time::Duration;

/// Fixed delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection has been requested yet
    Disconnected,
    /// A connection attempt is in flight
    Connecting,
    /// The connection is open and ready
    Connected,
    /// The connection closed; an attempt is scheduled
    Reconnecting,
}

impl ConnectionState {
    /// Lowercase state name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle signals fed into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// The owner asked for the room to be opened
    OpenRequested,
    /// The transport finished its handshake
    Opened,
    /// The transport reported an error
    Errored,
    /// The transport closed, for any reason
    Closed,
    /// The reconnect delay ran out
    RetryElapsed,
}

/// Work the owner of the machine has to perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a connection attempt
    Connect,
    /// Close the live transport; its close event drives the next transition
    CloseTransport,
    /// Wait for the given delay, then feed [`TransportEvent::RetryElapsed`]
    ScheduleReconnect(Duration),
}

/// Connection state machine with a fixed, unbounded retry policy.
#[derive(Debug, Clone)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
    attempts: u64,
}

impl ConnectionStateMachine {
    /// Create a machine in [`ConnectionState::Disconnected`].
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_delay,
            attempts: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of connection attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Delay applied after every close.
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    /// Apply an event and return the action to perform, if any.
    ///
    /// Errors never change the state; they only ask for the transport to be
    /// closed so that the close event drives the machine. Events that do not
    /// apply to the current state are ignored.
    pub fn transition(&mut self, event: TransportEvent) -> Option<Action> {
        use ConnectionState::*;
        use TransportEvent::*;

        let (next, action) = match (self.state, event) {
            (Disconnected, OpenRequested) | (Reconnecting, RetryElapsed) => {
                self.attempts += 1;
                (Connecting, Some(Action::Connect))
            }
            (Connecting, Opened) => (Connected, None),
            (Connecting | Connected, Errored) => (self.state, Some(Action::CloseTransport)),
            (Connecting | Connected, Closed) => (
                Reconnecting,
                Some(Action::ScheduleReconnect(self.reconnect_delay)),
            ),
            (state, event) => {
                tracing::trace!(state = %state, event = ?event, "Ignoring lifecycle event");
                (state, None)
            }
        };

        self.state = next;
        action
    }
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}
