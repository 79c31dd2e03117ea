//! Transport seam between the connection manager and the socket.
//!
//! A [`Connector`] opens one connection and hands back a [`TransportLink`]: an
//! outbound frame queue plus a stream of [`TransportSignal`]s. The production
//! connector drives a tokio-tungstenite socket from a reader task and a writer
//! task; tests build links with [`TransportLink::channel`] and play the server.

use crate::error::{ChatError, ChatResult};
use crate::message::Message;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle and data signals coming up from a live transport.
#[derive(Debug)]
pub enum TransportSignal {
    /// A data frame from the server
    Frame(Message),
    /// The transport failed; a `Closed` signal follows once it is shut down
    Error(ChatError),
    /// The transport is gone
    Closed,
}

/// Opens transports.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Open a connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the connection cannot be established.
    async fn connect(&self, url: &Url) -> ChatResult<TransportLink>;
}

/// The manager's side of one open transport.
#[derive(Debug)]
pub struct TransportLink {
    outgoing: mpsc::UnboundedSender<Message>,
    incoming: mpsc::UnboundedReceiver<TransportSignal>,
}

/// The transport's side of a [`TransportLink`].
#[derive(Debug)]
pub struct LinkPeer {
    /// Frames the manager wants written to the socket
    pub outgoing: mpsc::UnboundedReceiver<Message>,
    /// Signals to deliver to the manager
    pub incoming: mpsc::UnboundedSender<TransportSignal>,
}

impl TransportLink {
    /// Create a connected link/peer pair.
    pub fn channel() -> (Self, LinkPeer) {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        (
            Self {
                outgoing: outgoing_tx,
                incoming: incoming_rx,
            },
            LinkPeer {
                outgoing: outgoing_rx,
                incoming: incoming_tx,
            },
        )
    }

    /// Queue a frame for the socket.
    pub fn send(&self, message: Message) -> ChatResult<()> {
        self.outgoing
            .send(message)
            .map_err(|_| ChatError::ConnectionClosed)
    }

    /// Ask the transport to close. The close is reported back as a signal.
    pub fn close(&self) {
        let _ = self.outgoing.send(Message::close());
    }

    /// Next signal from the transport. `None` means the transport went away
    /// without saying so and is treated as a close.
    pub async fn next_signal(&mut self) -> Option<TransportSignal> {
        self.incoming.recv().await
    }
}

/// Connector backed by tokio-tungstenite.
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    connect_timeout: Duration,
}

impl Default for TungsteniteConnector {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl TungsteniteConnector {
    /// Create a connector with the default 30 second handshake timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handshake timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Writer task: drains the outbound queue into the socket.
    async fn writer_task(
        mut write: SplitSink<WsStream, tungstenite::Message>,
        mut rx: mpsc::UnboundedReceiver<Message>,
    ) {
        while let Some(message) = rx.recv().await {
            let is_close = message.is_close();

            if let Err(e) = write.send(message.into()).await {
                tracing::debug!(error = %e, "Failed to write WebSocket frame");
                break;
            }

            if is_close {
                break;
            }
        }

        let _ = write.close().await;
    }

    /// Reader task: forwards data frames, reports errors, always ends with `Closed`.
    async fn reader_task(
        mut read: SplitStream<WsStream>,
        tx: mpsc::UnboundedSender<TransportSignal>,
    ) {
        while let Some(result) = read.next().await {
            match result {
                Ok(raw) => match Message::from_raw(raw) {
                    Some(message) if message.is_close() => break,
                    Some(message) => {
                        if tx.send(TransportSignal::Frame(message)).is_err() {
                            break;
                        }
                    }
                    None => {}
                },
                Err(e) => {
                    let _ = tx.send(TransportSignal::Error(ChatError::Transport(e)));
                    break;
                }
            }
        }

        let _ = tx.send(TransportSignal::Closed);
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &Url) -> ChatResult<TransportLink> {
        let (ws_stream, _response) =
            tokio::time::timeout(self.connect_timeout, connect_async(url.as_str()))
                .await
                .map_err(|_| ChatError::ConnectTimeout(self.connect_timeout))??;

        let (write, read) = ws_stream.split();
        let (link, peer) = TransportLink::channel();

        tokio::spawn(Self::writer_task(write, peer.outgoing));
        tokio::spawn(Self::reader_task(read, peer.incoming));

        Ok(link)
    }
}
