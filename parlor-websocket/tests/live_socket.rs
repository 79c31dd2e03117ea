//! End-to-end tests against a local WebSocket server.

use futures_util::{SinkExt, StreamExt};
use parlor_websocket::*;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::WebSocketStream;

const WAIT: Duration = Duration::from_secs(5);

async fn accept(listener: &TcpListener) -> (WebSocketStream<TcpStream>, String) {
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    let mut path = String::new();
    let ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        path = req.uri().path().to_string();
        Ok(resp)
    })
    .await
    .unwrap();
    (ws, path)
}

async fn wait_for(handle: &ConnectionHandle, wanted: ConnectionState) {
    let mut state = handle.watch_state();
    timeout(WAIT, state.wait_for(|s| *s == wanted))
        .await
        .unwrap()
        .unwrap();
}

fn text(payload: &str) -> RawMessage {
    RawMessage::text(payload.to_string())
}

async fn setup(room: &str, delay: Duration) -> (TcpListener, ConnectionHandle, FrameReceiver) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = ManagerConfig {
        server_url: format!("ws://{addr}"),
        path_prefix: "ws".to_string(),
        reconnect_delay: delay,
    };
    let manager = ConnectionManager::new(TungsteniteConnector::new(), config).unwrap();
    let (handle, frames) = manager.open(RoomId::new(room));
    (listener, handle, frames)
}

#[tokio::test]
async fn test_chat_round_trip_over_socket() {
    let (listener, handle, mut frames) = setup("lobby", Duration::from_millis(50)).await;
    let (mut server, path) = accept(&listener).await;
    assert_eq!(path, "/ws/chat/lobby/");
    wait_for(&handle, ConnectionState::Connected).await;

    server
        .send(text(r#"{"type":"user_list","users":["alice","bob"]}"#))
        .await
        .unwrap();
    server
        .send(text(r#"{"type":"chat_message","user":"alice","message":"hi"}"#))
        .await
        .unwrap();
    server.send(text("not json")).await.unwrap();
    server
        .send(text(r#"{"type":"user_leave","user":"bob"}"#))
        .await
        .unwrap();

    let router = EventRouter::new();
    let mut view = BufferedView::new();
    for _ in 0..4 {
        let frame = timeout(WAIT, frames.recv()).await.unwrap().unwrap();
        router.handle(&frame, &mut view);
    }

    assert_eq!(view.log(), "alice: hi\nbob left the room.\n");
    assert_eq!(view.roster().iter().collect::<Vec<_>>(), vec!["alice"]);

    assert!(handle.send(&OutboundMessage::new("hello alice").unwrap()));
    let reply = timeout(WAIT, server.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap().as_str(), r#"{"message":"hello alice"}"#);
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let (listener, handle, _frames) = setup("night owls", Duration::from_millis(50)).await;

    let (mut server, path) = accept(&listener).await;
    assert_eq!(path, "/ws/chat/night%20owls/");
    wait_for(&handle, ConnectionState::Connected).await;

    server.close(None).await.unwrap();
    drop(server);

    let (_server, path) = accept(&listener).await;
    assert_eq!(path, "/ws/chat/night%20owls/");
    wait_for(&handle, ConnectionState::Connected).await;
}

#[tokio::test]
async fn test_reconnects_after_abrupt_drop() {
    let (listener, handle, _frames) = setup("lobby", Duration::from_millis(500)).await;

    let (server, _) = accept(&listener).await;
    wait_for(&handle, ConnectionState::Connected).await;
    drop(server);

    wait_for(&handle, ConnectionState::Reconnecting).await;
    assert!(!handle.send(&OutboundMessage::new("into the void").unwrap()));

    let (_server, _) = accept(&listener).await;
    wait_for(&handle, ConnectionState::Connected).await;
}
