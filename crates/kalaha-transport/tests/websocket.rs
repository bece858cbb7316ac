//! Integration tests for the WebSocket connection against a loopback
//! echo server.

use futures_util::{SinkExt, StreamExt};
use kalaha_transport::{Connection, WebSocketConnection};
use tokio::net::TcpListener;

/// Spawns a WebSocket server that echoes every text frame back, then
/// performs a clean close when the client closes. Returns its URL.
async fn spawn_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws =
                    tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    if msg.is_text() {
                        let _ = ws.send(msg).await;
                    } else if msg.is_close() {
                        break;
                    }
                }
            });
        }
    });
    format!("ws://{addr}")
}

/// Spawns a server that sends one frame and then closes cleanly.
async fn spawn_one_shot_server(frame: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(tokio_tungstenite::tungstenite::Message::Text(
            frame.to_string().into(),
        ))
        .await
        .unwrap();
        ws.close(None).await.unwrap();
    });
    format!("ws://{addr}")
}

#[tokio::test]
async fn test_send_and_recv_round_trip() {
    let url = spawn_echo_server().await;
    let conn = WebSocketConnection::connect(&url).await.unwrap();

    conn.send("wait-for-game").await.unwrap();
    let frame = conn.recv().await.unwrap();
    assert_eq!(frame.as_deref(), Some("wait-for-game"));
}

#[tokio::test]
async fn test_frames_are_delivered_in_order() {
    let url = spawn_echo_server().await;
    let conn = WebSocketConnection::connect(&url).await.unwrap();

    for i in 0..5 {
        conn.send(&format!("##{i}")).await.unwrap();
    }
    for i in 0..5 {
        let frame = conn.recv().await.unwrap();
        assert_eq!(frame, Some(format!("##{i}")));
    }
}

#[tokio::test]
async fn test_recv_returns_none_after_clean_close() {
    let url = spawn_one_shot_server("end").await;
    let conn = WebSocketConnection::connect(&url).await.unwrap();

    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("end"));
    assert_eq!(conn.recv().await.unwrap(), None);
}

#[tokio::test]
async fn test_connections_get_unique_ids() {
    let url = spawn_echo_server().await;
    let a = WebSocketConnection::connect(&url).await.unwrap();
    let b = WebSocketConnection::connect(&url).await.unwrap();
    assert_ne!(a.id(), b.id());
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    // Bind and immediately drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WebSocketConnection::connect(&format!("ws://{addr}")).await;
    assert!(result.is_err());
}

/// Drains one frame through the trait, not the concrete type, so the
/// spawn below type-checks against `Connection`'s own bounds.
async fn recv_one<C: Connection>(conn: C) -> Option<String> {
    conn.recv().await.unwrap()
}

// The session layer runs its reader on a spawned task over a generic
// connection; the trait's futures must be Send for that to compile.
#[tokio::test]
async fn test_recv_runs_on_a_spawned_task() {
    let url = spawn_one_shot_server("##turn").await;
    let conn = WebSocketConnection::connect(&url).await.unwrap();

    let frame = tokio::spawn(recv_one(conn)).await.unwrap();
    assert_eq!(frame.as_deref(), Some("##turn"));
}

#[tokio::test]
async fn test_clone_shares_the_socket() {
    let url = spawn_echo_server().await;
    let conn = WebSocketConnection::connect(&url).await.unwrap();
    let clone = conn.clone();
    assert_eq!(conn.id(), clone.id());

    clone.send("##turn").await.unwrap();
    assert_eq!(conn.recv().await.unwrap().as_deref(), Some("##turn"));
}
