//! Connection manager: keeps one connection per room alive.
//!
//! [`ConnectionManager::open`] spawns a driver task that owns the transport and
//! the [`ConnectionStateMachine`]. The caller gets a [`ConnectionHandle`] for
//! sending and observing state, plus a receiver of inbound frames in arrival
//! order. Every close, whatever its cause, is followed by a new attempt after
//! the fixed reconnect delay.

use crate::connection::{Connector, TransportLink, TransportSignal};
use crate::error::ChatResult;
use crate::message::Message;
use crate::protocol::OutboundMessage;
use crate::room::{RoomEndpoint, RoomId};
use crate::state::{
    Action, ConnectionState, ConnectionStateMachine, TransportEvent, DEFAULT_RECONNECT_DELAY,
};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use url::Url;

/// Inbound frames forwarded by the manager, in arrival order.
pub type FrameReceiver = mpsc::UnboundedReceiver<Message>;

/// Connection manager configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Server origin, e.g. `ws://127.0.0.1:8000`
    pub server_url: String,
    /// Socket route prefix, e.g. `ws`
    pub path_prefix: String,
    /// Delay between a close and the next attempt
    pub reconnect_delay: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8000".to_string(),
            path_prefix: "ws".to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Owns the connection to a chat room.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    endpoint: RoomEndpoint,
    reconnect_delay: Duration,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidEndpoint`](crate::ChatError::InvalidEndpoint)
    /// when the server URL cannot carry a room path.
    pub fn new(connector: C, config: ManagerConfig) -> ChatResult<Self> {
        let endpoint = RoomEndpoint::new(&config.server_url, &config.path_prefix)?;
        Ok(Self {
            connector,
            endpoint,
            reconnect_delay: config.reconnect_delay,
        })
    }

    /// Socket URL for a room.
    pub fn endpoint(&self, room: &RoomId) -> Url {
        self.endpoint.for_room(room)
    }

    /// Start connecting to `room`.
    ///
    /// Transport errors never reach the caller: they are logged and retried.
    /// The manager runs until the returned handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the driver task is
    /// started with [`tokio::spawn`].
    pub fn open(self, room: RoomId) -> (ConnectionHandle, FrameReceiver) {
        let url = self.endpoint.for_room(&room);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        let driver = ConnectionDriver {
            connector: self.connector,
            url: url.clone(),
            machine: ConnectionStateMachine::new(self.reconnect_delay),
            state: state_tx,
            commands: command_rx,
            frames: frame_tx,
        };
        tokio::spawn(driver.run());

        let handle = ConnectionHandle {
            room,
            url,
            state: state_rx,
            commands: command_tx,
        };
        (handle, frame_rx)
    }
}

#[derive(Debug)]
enum Command {
    Send(Message),
}

/// Owned handle to a running connection manager.
#[derive(Debug)]
pub struct ConnectionHandle {
    room: RoomId,
    url: Url,
    state: watch::Receiver<ConnectionState>,
    commands: mpsc::UnboundedSender<Command>,
}

impl ConnectionHandle {
    /// The room this handle is connected to.
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// The socket URL in use.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// A receiver that observes state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Send a chat message.
    ///
    /// Best effort: when the connection is not [`ConnectionState::Connected`]
    /// the message is dropped. Nothing is queued or retried. Returns whether the
    /// message was handed to the open connection.
    pub fn send(&self, message: &OutboundMessage) -> bool {
        let state = self.state();
        if state != ConnectionState::Connected {
            tracing::debug!(room = %self.room, state = %state, "Dropping message while not connected");
            return false;
        }

        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(room = %self.room, error = %e, "Failed to encode message");
                return false;
            }
        };

        self.commands.send(Command::Send(frame)).is_ok()
    }
}

/// Task that owns the transport and the state machine.
struct ConnectionDriver<C: Connector> {
    connector: C,
    url: Url,
    machine: ConnectionStateMachine,
    state: watch::Sender<ConnectionState>,
    commands: mpsc::UnboundedReceiver<Command>,
    frames: mpsc::UnboundedSender<Message>,
}

impl<C: Connector> ConnectionDriver<C> {
    async fn run(mut self) {
        let mut next = self.apply(TransportEvent::OpenRequested);

        while let Some(action) = next {
            next = match action {
                Action::Connect => self.connect().await,
                Action::ScheduleReconnect(delay) => self.reconnect_after(delay).await,
                // Only produced while a link is live, and handled in `pump`.
                Action::CloseTransport => None,
            };
        }

        tracing::debug!(url = %self.url, "Connection manager stopped");
    }

    fn apply(&mut self, event: TransportEvent) -> Option<Action> {
        let before = self.machine.state();
        let action = self.machine.transition(event);
        let after = self.machine.state();

        if before != after {
            tracing::debug!(url = %self.url, from = %before, to = %after, "Connection state changed");
            let _ = self.state.send(after);
        }
        action
    }

    async fn connect(&mut self) -> Option<Action> {
        tracing::info!(url = %self.url, attempt = self.machine.attempts(), "Connecting");

        match self.connector.connect(&self.url).await {
            Ok(link) => {
                if !self.discard_pending_sends() {
                    link.close();
                    return None;
                }
                self.apply(TransportEvent::Opened);
                tracing::info!(url = %self.url, "Connected");
                self.pump(link).await
            }
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "Connection attempt failed");
                // Nothing is open yet, so there is no transport to close.
                let _ = self.apply(TransportEvent::Errored);
                self.apply(TransportEvent::Closed)
            }
        }
    }

    /// Move frames between the live link, the router, and the handle until the
    /// link closes.
    async fn pump(&mut self, mut link: TransportLink) -> Option<Action> {
        loop {
            tokio::select! {
                signal = link.next_signal() => match signal {
                    Some(TransportSignal::Frame(frame)) => {
                        if self.frames.send(frame).is_err() {
                            tracing::debug!(url = %self.url, "Frame receiver dropped; discarding frame");
                        }
                    }
                    Some(TransportSignal::Error(e)) => {
                        tracing::error!(url = %self.url, error = %e, "WebSocket error, closing the socket");
                        if let Some(Action::CloseTransport) = self.apply(TransportEvent::Errored) {
                            link.close();
                        }
                    }
                    Some(TransportSignal::Closed) | None => {
                        tracing::warn!(
                            url = %self.url,
                            delay_ms = self.machine.reconnect_delay().as_millis() as u64,
                            "Connection closed, reconnecting after delay"
                        );
                        return self.apply(TransportEvent::Closed);
                    }
                },
                command = self.commands.recv() => match command {
                    Some(Command::Send(frame)) => {
                        if self.machine.state() != ConnectionState::Connected {
                            tracing::debug!(url = %self.url, "Dropping message while not connected");
                        } else if let Err(e) = link.send(frame) {
                            tracing::debug!(url = %self.url, error = %e, "Failed to queue message");
                        }
                    }
                    None => {
                        link.close();
                        return None;
                    }
                },
            }
        }
    }

    /// Sleep out the reconnect delay. The timer is not cut short; a handle
    /// dropped in the meantime is noticed once it fires.
    async fn reconnect_after(&mut self, delay: Duration) -> Option<Action> {
        tokio::time::sleep(delay).await;

        if !self.discard_pending_sends() {
            return None;
        }
        tracing::info!(url = %self.url, "Reconnecting");
        self.apply(TransportEvent::RetryElapsed)
    }

    /// Drop sends that were queued while the connection was down. Returns
    /// `false` once the handle is gone.
    fn discard_pending_sends(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(Command::Send(_)) => {
                    tracing::debug!(url = %self.url, "Dropping message queued while not connected");
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}
