//! Integration tests for `SessionClient` against a scripted mock
//! connection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kalaha_board::BoardState;
use kalaha_protocol::{ActiveSession, ServerEvent};
use kalaha_session::{SessionClient, SessionEvent};
use kalaha_transport::{Connection, ConnectionId, TransportError};
use tokio::sync::mpsc;

/// A connection whose inbound frames are scripted by the test. Outbound
/// frames are captured for inspection. `Some(frame)` feeds a frame,
/// `None` (or dropping the feeder) simulates a clean close.
#[derive(Clone)]
struct MockConnection {
    sent: Arc<Mutex<Vec<String>>>,
    inbound: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Option<String>>>>,
}

fn mock_connection() -> (
    MockConnection,
    mpsc::UnboundedSender<Option<String>>,
    Arc<Mutex<Vec<String>>>,
) {
    let (feed, inbound) = mpsc::unbounded_channel();
    let sent = Arc::new(Mutex::new(Vec::new()));
    let conn = MockConnection {
        sent: Arc::clone(&sent),
        inbound: Arc::new(tokio::sync::Mutex::new(inbound)),
    };
    (conn, feed, sent)
}

impl Connection for MockConnection {
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        self.sent.lock().unwrap().push(frame.to_string());
        Ok(())
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        match self.inbound.lock().await.recv().await {
            Some(Some(frame)) => Ok(Some(frame)),
            Some(None) | None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(0)
    }
}

fn session() -> ActiveSession {
    ActiveSession {
        user_id: "facebook:100012".into(),
        session_id: "sess-42".into(),
    }
}

async fn next_event(rx: &mut mpsc::Receiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_handshake_is_the_first_outbound_frame() {
    let (conn, _feed, sent) = mock_connection();
    let (_client, _rx) = SessionClient::open(conn, &session()).await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.as_slice(), ["facebook:100012=sess-42"]);
}

#[tokio::test]
async fn test_submit_move_before_any_turn_frame_is_dropped() {
    let (conn, _feed, sent) = mock_connection();
    let (client, _rx) = SessionClient::open(conn, &session()).await.unwrap();

    client.submit_move(3).await;

    // Only the handshake went out.
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert!(!client.is_my_turn());
}

#[tokio::test]
async fn test_submit_move_after_turn_granted_sends_frame() {
    let (conn, feed, sent) = mock_connection();
    let (client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(Some("##turn".into())).unwrap();
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::TurnGranted)
    );

    client.submit_move(3).await;
    let sent = sent.lock().unwrap();
    assert_eq!(sent.last().map(String::as_str), Some("##3"));
}

#[tokio::test]
async fn test_turn_denied_revokes_the_turn() {
    let (conn, feed, sent) = mock_connection();
    let (client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(Some("##turn".into())).unwrap();
    next_event(&mut rx).await;
    feed.send(Some("##~turn".into())).unwrap();
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::TurnDenied)
    );

    client.submit_move(2).await;
    assert_eq!(sent.lock().unwrap().len(), 1); // handshake only
}

#[tokio::test]
async fn test_events_arrive_in_frame_order() {
    let (conn, feed, _sent) = mock_connection();
    let (_client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(Some("opponent=Bob".into())).unwrap();
    feed.send(Some("##turn".into())).unwrap();
    feed.send(Some("$$6-6-6-6-6-6-0-6-6-6-6-6-6-0".into())).unwrap();
    feed.send(Some("end".into())).unwrap();

    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::OpponentAssigned {
            opponent: "Bob".into()
        })
    );
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::TurnGranted)
    );
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::BoardUpdate(
            BoardState::initial()
        ))
    );
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::MatchEnded)
    );
}

#[tokio::test]
async fn test_unknown_and_malformed_frames_are_not_forwarded() {
    let (conn, feed, _sent) = mock_connection();
    let (_client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(Some("no-such-frame".into())).unwrap();
    feed.send(Some("$$1-2-3".into())).unwrap(); // malformed board
    feed.send(Some("##turn".into())).unwrap();

    // The first event the consumer sees is the valid one.
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Protocol(ServerEvent::TurnGranted)
    );
}

#[tokio::test]
async fn test_clean_close_surfaces_disconnected() {
    let (conn, feed, _sent) = mock_connection();
    let (_client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(None).unwrap();
    assert_eq!(next_event(&mut rx).await, SessionEvent::Disconnected);

    // Terminal: the channel closes after Disconnected.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_match_ended_revokes_the_turn() {
    let (conn, feed, sent) = mock_connection();
    let (client, mut rx) = SessionClient::open(conn, &session()).await.unwrap();

    feed.send(Some("##turn".into())).unwrap();
    next_event(&mut rx).await;
    feed.send(Some("end".into())).unwrap();
    next_event(&mut rx).await;

    client.submit_move(5).await;
    assert_eq!(sent.lock().unwrap().len(), 1);
}
