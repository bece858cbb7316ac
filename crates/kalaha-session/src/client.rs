//! The session client: exclusive owner of one open match socket.
//!
//! [`SessionClient::open`] sends the handshake frame and then moves the
//! receive half of the connection into a background task. That task is the
//! only reader: it decodes each inbound frame, keeps the turn flag
//! current, and forwards the typed event to the single registered
//! consumer over a bounded channel — in the exact order the transport
//! delivered the frames.
//!
//! Undecodable and unrecognized frames are logged and dropped here; the
//! consumer never sees them, so a protocol extension can't wedge the
//! state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kalaha_protocol::{ActiveSession, ClientFrame, ServerEvent};
use kalaha_transport::Connection;
use tokio::sync::mpsc;

use crate::SessionError;

/// Capacity of the event channel between the reader task and the consumer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// An event surfaced to the session's consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A decoded protocol frame, in arrival order.
    Protocol(ServerEvent),
    /// The socket closed or failed. Terminal: nothing follows this event,
    /// and no reconnect is attempted — that policy belongs to the
    /// consumer.
    Disconnected,
}

/// Owns the match socket for the lifetime of one connection attempt.
///
/// There is no way to obtain a `SessionClient` without sending the
/// handshake: [`open`](Self::open) is the only constructor and it writes
/// the handshake frame before the reader task exists, so no other frame
/// can ever precede it.
pub struct SessionClient<C: Connection + Clone> {
    conn: C,
    user_id: String,
    my_turn: Arc<AtomicBool>,
}

impl<C: Connection + Clone> SessionClient<C> {
    /// Performs the socket handshake and starts the reader task.
    ///
    /// `conn` must already be open at the transport level. Returns the
    /// client handle and the receiving end of the event channel; the
    /// receiver is the session's single consumer.
    ///
    /// # Errors
    /// Returns [`SessionError::Transport`] if the handshake frame cannot
    /// be sent.
    pub async fn open(
        conn: C,
        session: &ActiveSession,
    ) -> Result<(Self, mpsc::Receiver<SessionEvent>), SessionError> {
        let handshake = ClientFrame::Handshake(session.clone()).encode();
        conn.send(&handshake)
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        tracing::debug!(conn = %conn.id(), %session, "handshake sent");

        let my_turn = Arc::new(AtomicBool::new(false));
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(recv_loop(
            conn.clone(),
            events_tx,
            Arc::clone(&my_turn),
        ));

        Ok((
            Self {
                conn,
                user_id: session.user_id.clone(),
                my_turn,
            },
            events_rx,
        ))
    }

    /// The user id this session was opened for.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the last turn indicator granted the local player the turn.
    pub fn is_my_turn(&self) -> bool {
        self.my_turn.load(Ordering::Acquire)
    }

    /// Submits a move for the given visual pit index (1–6).
    ///
    /// A silent no-op when it is not the local player's turn — the state
    /// machine gates on phase as well, but the socket owner is the last
    /// line of defense against writing out-of-turn frames. Send failures
    /// are logged, not returned: the reader task will surface the broken
    /// socket as [`SessionEvent::Disconnected`].
    pub async fn submit_move(&self, pit: u8) {
        if !self.my_turn.load(Ordering::Acquire) {
            tracing::debug!(
                conn = %self.conn.id(),
                pit,
                "move dropped: not this player's turn"
            );
            return;
        }
        let frame = ClientFrame::Move(pit).encode();
        if let Err(e) = self.conn.send(&frame).await {
            tracing::warn!(
                conn = %self.conn.id(),
                error = %e,
                "sending move failed"
            );
        }
    }

    /// Closes the socket. The reader task then emits
    /// [`SessionEvent::Disconnected`] and exits.
    pub async fn close(&self) {
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn = %self.conn.id(), error = %e, "close failed");
        }
    }
}

/// The single reader: decode, track the turn flag, forward in order.
async fn recv_loop<C: Connection>(
    conn: C,
    events: mpsc::Sender<SessionEvent>,
    my_turn: Arc<AtomicBool>,
) {
    loop {
        match conn.recv().await {
            Ok(Some(frame)) => match ServerEvent::decode(&frame) {
                Ok(ServerEvent::Unrecognized) => {
                    tracing::debug!(
                        conn = %conn.id(),
                        frame,
                        "discarding unrecognized frame"
                    );
                }
                Ok(event) => {
                    // The flag must be current before the consumer can
                    // react to the event.
                    match event {
                        ServerEvent::TurnGranted => {
                            my_turn.store(true, Ordering::Release);
                        }
                        ServerEvent::TurnDenied
                        | ServerEvent::WaitingForMatch
                        | ServerEvent::MatchEnded => {
                            my_turn.store(false, Ordering::Release);
                        }
                        _ => {}
                    }
                    if events
                        .send(SessionEvent::Protocol(event))
                        .await
                        .is_err()
                    {
                        // Consumer dropped the receiver; stop reading.
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        conn = %conn.id(),
                        frame,
                        error = %e,
                        "discarding undecodable frame"
                    );
                }
            },
            Ok(None) => {
                tracing::info!(conn = %conn.id(), "connection closed");
                let _ = events.send(SessionEvent::Disconnected).await;
                break;
            }
            Err(e) => {
                tracing::debug!(conn = %conn.id(), error = %e, "recv failed");
                let _ = events.send(SessionEvent::Disconnected).await;
                break;
            }
        }
    }
}
