//! The match session state machine.
//!
//! [`MatchSession`] drives the whole client: it owns the current
//! [`MatchPhase`], the per-match state (seat assignment, opponent), the
//! session client, and the view. Protocol events and user actions are
//! handled one at a time in arrival order; nothing here blocks, and every
//! await suspends only at an external seam (authenticator, broker,
//! directory, socket).
//!
//! Transition table (initial phase `LoggedOut`):
//!
//! ```text
//! LoggedOut      login() ok                     → Authenticating
//! Authenticating attach(conn)                   → Searching
//! Searching      search input (≥3 chars, new)   → Searching (query issued)
//! Searching      OpponentAssigned               → AwaitingOpponent
//! Searching      WaitingForMatch                → Searching
//! AwaitingOpponent  TurnGranted (seats lower)   → MyTurn
//! AwaitingOpponent  TurnDenied  (seats upper)   → OpponentTurn
//! My/OpponentTurn   BoardUpdate                 → unchanged (render)
//! My/OpponentTurn   TurnGranted / TurnDenied    → MyTurn / OpponentTurn
//! in-game        MatchEnded                     → Ended
//! any            WaitingForMatch (re-entry)     → Searching (match state cleared)
//! any            auth failure / Disconnected    → LoggedOut
//! ```
//!
//! The seat ([`TurnAssignment`]) is resolved by the *first* turn indicator
//! of a match and never re-resolved until `WaitingForMatch` tears the
//! match down. Board snapshots arriving before the seat is known are
//! discarded rather than guessed at.

use std::fmt;

use kalaha_board::{TurnAssignment, render};
use kalaha_protocol::{ActiveSession, SearchHit, ServerEvent};
use kalaha_session::{
    Authenticator, SessionBroker, SessionClient, SessionEvent,
};
use kalaha_transport::Connection;
use tokio::sync::mpsc;

use crate::{Directory, DirectoryError, KalahaError, View};

/// Minimum number of characters before a search query is issued.
const MIN_QUERY_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// MatchPhase
// ---------------------------------------------------------------------------

/// The one active phase of the client. Transitions are driven only by
/// protocol events and user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// No identity; the login screen is showing.
    LoggedOut,
    /// Identity asserted; session negotiation / socket attach pending.
    Authenticating,
    /// Connected and queued; the opponent search screen is showing.
    Searching,
    /// An opponent was assigned; waiting for the first turn indicator.
    AwaitingOpponent,
    /// In a match, local player to move.
    MyTurn,
    /// In a match, opponent to move.
    OpponentTurn,
    /// The match concluded.
    Ended,
}

impl MatchPhase {
    /// Phases during which a match exists (an opponent is assigned).
    pub fn is_in_game(self) -> bool {
        matches!(
            self,
            MatchPhase::AwaitingOpponent
                | MatchPhase::MyTurn
                | MatchPhase::OpponentTurn
        )
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchPhase::LoggedOut => "logged-out",
            MatchPhase::Authenticating => "authenticating",
            MatchPhase::Searching => "searching",
            MatchPhase::AwaitingOpponent => "awaiting-opponent",
            MatchPhase::MyTurn => "my-turn",
            MatchPhase::OpponentTurn => "opponent-turn",
            MatchPhase::Ended => "ended",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// MatchSession
// ---------------------------------------------------------------------------

/// The top-level client state machine.
///
/// Sole owner and sole writer of the phase, the seat assignment, and the
/// opponent record; the view only ever receives pushed snapshots. One
/// instance serves one player across any number of matches.
pub struct MatchSession<C, V, D>
where
    C: Connection + Clone,
    V: View,
    D: Directory,
{
    view: V,
    directory: D,
    phase: MatchPhase,
    turn: TurnAssignment,
    opponent: Option<String>,
    session: Option<ActiveSession>,
    client: Option<SessionClient<C>>,
    /// Last issued query, for consecutive-duplicate suppression.
    last_query: Option<String>,
    /// Bumped for every issued search; completions carrying an older
    /// value are stale and dropped.
    search_generation: u64,
}

impl<C, V, D> MatchSession<C, V, D>
where
    C: Connection + Clone,
    V: View,
    D: Directory,
{
    /// Creates a session machine showing the login screen.
    pub fn new(mut view: V, directory: D) -> Self {
        view.show_screen(MatchPhase::LoggedOut);
        Self {
            view,
            directory,
            phase: MatchPhase::LoggedOut,
            turn: TurnAssignment::unassigned(),
            opponent: None,
            session: None,
            client: None,
            last_query: None,
            search_generation: 0,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// The current opponent's display name, while a match exists.
    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    // -- Login workflow ----------------------------------------------------

    /// Runs the sequential login workflow: authenticate, then negotiate a
    /// session. Each stage's result is validated before the next starts.
    ///
    /// On success the machine holds a negotiated session and is in
    /// `Authenticating`, waiting for [`attach`](Self::attach).
    ///
    /// # Errors
    /// Any authentication or negotiation failure returns the machine to
    /// `LoggedOut` (the login prompt) and propagates the error.
    pub async fn login<A, B>(
        &mut self,
        auth: &A,
        broker: &B,
    ) -> Result<(), KalahaError>
    where
        A: Authenticator,
        B: SessionBroker,
    {
        let principal = match auth.authenticate().await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                self.set_phase(MatchPhase::LoggedOut);
                return Err(e.into());
            }
        };
        tracing::info!(
            user = %principal.build_username(),
            "authenticated"
        );
        self.set_phase(MatchPhase::Authenticating);

        match broker.create_session(&principal).await {
            Ok(session) => {
                tracing::info!(%session, "session negotiated");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "session negotiation failed");
                self.set_phase(MatchPhase::LoggedOut);
                Err(e.into())
            }
        }
    }

    /// Attaches an open connection: performs the socket handshake and
    /// enters `Searching`. Returns the event stream the caller must pump
    /// into [`handle_event`](Self::handle_event).
    ///
    /// A repeated attach supersedes the previous connection: the old
    /// socket is closed and all match-scoped state is cleared.
    ///
    /// # Errors
    /// [`KalahaError::NotAuthenticated`] without a prior successful
    /// [`login`](Self::login); otherwise the handshake send error.
    pub async fn attach(
        &mut self,
        conn: C,
    ) -> Result<mpsc::Receiver<SessionEvent>, KalahaError> {
        let session =
            self.session.as_ref().ok_or(KalahaError::NotAuthenticated)?;
        if let Some(old) = self.client.take() {
            tracing::debug!("superseding previous connection");
            old.close().await;
        }
        let (client, events) = SessionClient::open(conn, session).await?;
        self.client = Some(client);
        self.reset_match_state();
        self.set_phase(MatchPhase::Searching);
        Ok(events)
    }

    // -- Protocol events ---------------------------------------------------

    /// Handles one session event. Events must be delivered in the order
    /// the socket produced them; the first-turn-indicator seat resolution
    /// depends on it.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Protocol(ev) => self.handle_protocol_event(ev),
            SessionEvent::Disconnected => {
                tracing::info!("socket disconnected");
                self.client = None;
                self.session = None;
                self.reset_match_state();
                self.set_phase(MatchPhase::LoggedOut);
            }
        }
    }

    fn handle_protocol_event(&mut self, event: ServerEvent) {
        // Frames can still be queued in the channel after a logout tore
        // the client down; without a client, nothing may change phase.
        if self.client.is_none() {
            tracing::debug!(?event, "frame after detach, ignored");
            return;
        }
        match event {
            ServerEvent::OpponentAssigned { opponent } => {
                if self.phase != MatchPhase::Searching {
                    tracing::debug!(
                        phase = %self.phase,
                        "opponent assignment outside matchmaking, ignored"
                    );
                    return;
                }
                tracing::info!(%opponent, "match found");
                self.turn.clear();
                self.view.set_opponent_label(&opponent);
                self.opponent = Some(opponent);
                self.set_phase(MatchPhase::AwaitingOpponent);
            }

            ServerEvent::WaitingForMatch => {
                // Queued, or a server-initiated match teardown (opponent
                // vanished before or during the game). Either way all
                // match-scoped state is cleared.
                if self.phase != MatchPhase::Searching {
                    tracing::info!(
                        phase = %self.phase,
                        "returned to matchmaking queue"
                    );
                }
                self.reset_match_state();
                self.set_phase(MatchPhase::Searching);
            }

            ServerEvent::TurnGranted => {
                if !self.phase.is_in_game() {
                    tracing::debug!(phase = %self.phase, "turn grant ignored");
                    return;
                }
                self.turn.resolve(true);
                self.view.set_move_enabled(true);
                self.set_phase(MatchPhase::MyTurn);
            }

            ServerEvent::TurnDenied => {
                if !self.phase.is_in_game() {
                    tracing::debug!(phase = %self.phase, "turn denial ignored");
                    return;
                }
                self.turn.resolve(false);
                self.view.set_move_enabled(false);
                self.set_phase(MatchPhase::OpponentTurn);
            }

            ServerEvent::BoardUpdate(board) => {
                if !self.phase.is_in_game() {
                    tracing::debug!(
                        phase = %self.phase,
                        "board update outside a match, ignored"
                    );
                    return;
                }
                match self.turn.user_side() {
                    Some(side) => {
                        // Recomputed on every snapshot; the rendered board
                        // is never cached across seat assignments.
                        self.view.render_board(&render(&board, side));
                    }
                    None => {
                        tracing::debug!(
                            "board update before seat assignment, ignored"
                        );
                    }
                }
            }

            ServerEvent::MatchEnded => {
                if !self.phase.is_in_game() {
                    tracing::debug!(phase = %self.phase, "end frame ignored");
                    return;
                }
                tracing::info!("match ended");
                self.view.set_move_enabled(false);
                self.set_phase(MatchPhase::Ended);
            }

            // Filtered out by the session layer; nothing to do here.
            ServerEvent::Unrecognized => {}
        }
    }

    // -- User actions ------------------------------------------------------

    /// Handles opponent search input end to end: applies the query policy,
    /// runs the directory call, and renders the results unless they went
    /// stale while in flight.
    ///
    /// # Errors
    /// Directory failures propagate; an unauthorized result additionally
    /// returns the machine to `LoggedOut`.
    pub async fn search(&mut self, input: &str) -> Result<(), KalahaError> {
        let Some((generation, query)) = self.begin_search(input) else {
            return Ok(());
        };
        match self.directory.search(&query).await {
            Ok(hits) => {
                self.search_completed(generation, hits);
                Ok(())
            }
            Err(e) => {
                self.handle_directory_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Applies the search query policy. Returns the generation token and
    /// normalized query if a directory request should be issued.
    ///
    /// Policy: queries under three characters issue nothing and clear the
    /// result list (and the duplicate-suppression memory with it);
    /// a query identical to the previous issued one is suppressed.
    pub fn begin_search(&mut self, input: &str) -> Option<(u64, String)> {
        if self.phase != MatchPhase::Searching {
            tracing::debug!(phase = %self.phase, "search input ignored");
            return None;
        }
        let query = input.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.last_query = None;
            self.view.render_search_results(&[]);
            return None;
        }
        if self.last_query.as_deref() == Some(query) {
            tracing::debug!(query, "duplicate query suppressed");
            return None;
        }
        self.last_query = Some(query.to_string());
        self.search_generation += 1;
        tracing::debug!(
            query,
            generation = self.search_generation,
            "search issued"
        );
        Some((self.search_generation, query.to_string()))
    }

    /// Applies the results of a completed search, unless a newer query
    /// was issued while this one was in flight.
    pub fn search_completed(
        &mut self,
        generation: u64,
        hits: Vec<SearchHit>,
    ) {
        if generation != self.search_generation {
            tracing::debug!(
                generation,
                current = self.search_generation,
                "stale search results dropped"
            );
            return;
        }
        if self.phase != MatchPhase::Searching {
            return;
        }
        self.view.render_search_results(&hits);
    }

    /// Asks the directory to invite `opponent_id` to a game. A no-op
    /// outside `Searching`. The match itself (if accepted) starts later,
    /// via an `opponent=` frame.
    ///
    /// # Errors
    /// Directory failures propagate; an unauthorized result additionally
    /// returns the machine to `LoggedOut`.
    pub async fn request_game(
        &mut self,
        opponent_id: &str,
    ) -> Result<(), KalahaError> {
        if self.phase != MatchPhase::Searching {
            tracing::debug!(
                phase = %self.phase,
                "game request ignored outside matchmaking"
            );
            return Ok(());
        }
        match self.directory.request_game(opponent_id).await {
            Ok(()) => {
                tracing::info!(opponent_id, "game request relayed");
                Ok(())
            }
            Err(e) => {
                self.handle_directory_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Submits a move for the given visual pit index (1–6).
    ///
    /// Accepted only during `MyTurn`; in any other phase this is a silent
    /// no-op, not an error. Move legality is the server's responsibility —
    /// no local validation is performed.
    pub async fn submit_move(&mut self, pit: u8) {
        if self.phase != MatchPhase::MyTurn {
            tracing::debug!(
                phase = %self.phase,
                pit,
                "move ignored outside the player's turn"
            );
            return;
        }
        if let Some(client) = &self.client {
            client.submit_move(pit).await;
        }
    }

    // -- Internals ---------------------------------------------------------

    fn set_phase(&mut self, phase: MatchPhase) {
        if self.phase != phase {
            tracing::debug!(from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
            self.view.show_screen(phase);
        }
    }

    /// Clears everything scoped to one match: opponent, seat assignment,
    /// and the (disabled) move input. The rendered board needs no clearing
    /// because it is never stored.
    fn reset_match_state(&mut self) {
        self.opponent = None;
        self.turn.clear();
        self.view.set_move_enabled(false);
    }

    async fn handle_directory_error(&mut self, error: &DirectoryError) {
        match error {
            DirectoryError::Unauthorized => {
                tracing::warn!("session no longer authorized");
                if let Some(client) = self.client.take() {
                    client.close().await;
                }
                self.session = None;
                self.reset_match_state();
                self.set_phase(MatchPhase::LoggedOut);
            }
            DirectoryError::RequestFailed(message) => {
                // Non-fatal: the screen keeps its state and the user can
                // retry.
                tracing::warn!(message, "directory call failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_game_phases() {
        assert!(MatchPhase::AwaitingOpponent.is_in_game());
        assert!(MatchPhase::MyTurn.is_in_game());
        assert!(MatchPhase::OpponentTurn.is_in_game());
        assert!(!MatchPhase::LoggedOut.is_in_game());
        assert!(!MatchPhase::Searching.is_in_game());
        assert!(!MatchPhase::Ended.is_in_game());
    }

    #[test]
    fn test_phase_display_names() {
        assert_eq!(MatchPhase::LoggedOut.to_string(), "logged-out");
        assert_eq!(MatchPhase::MyTurn.to_string(), "my-turn");
        assert_eq!(
            MatchPhase::AwaitingOpponent.to_string(),
            "awaiting-opponent"
        );
    }
}
