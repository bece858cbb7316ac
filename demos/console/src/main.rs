//! Terminal Kalaha client.
//!
//! Connects to a match server, plays through the full session flow, and
//! draws the board as ASCII. Identity comes from environment variables;
//! there is no real login provider here, so the authenticator and broker
//! are local stand-ins suitable for a development server.
//!
//! ```text
//! KALAHA_URL=ws://127.0.0.1:8080/game KALAHA_USER=ada cargo run -p kalaha-console
//! ```
//!
//! Commands at the prompt: `move <1-6>`, `search <name>`, `invite <id>`,
//! `quit`.

use kalaha_client::prelude::*;
use kalaha_session::SessionError;
use kalaha_transport::WebSocketConnection;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Local login stand-ins
// ---------------------------------------------------------------------------

/// Asserts whatever identity the environment provides.
struct EnvAuthenticator;

impl Authenticator for EnvAuthenticator {
    async fn authenticate(&self) -> Result<Principal, SessionError> {
        let user = std::env::var("KALAHA_USER")
            .map_err(|_| SessionError::AuthFailed("KALAHA_USER not set".into()))?;
        Ok(Principal {
            provider_id: "console".into(),
            principal_id: user.clone(),
            display_name: user,
            token: std::env::var("KALAHA_TOKEN").unwrap_or_default(),
        })
    }
}

/// Mints a session locally instead of calling a session endpoint. Good
/// enough for a dev server that accepts any handshake.
struct LocalBroker;

impl SessionBroker for LocalBroker {
    async fn create_session(
        &self,
        principal: &Principal,
    ) -> Result<ActiveSession, SessionError> {
        Ok(ActiveSession {
            user_id: principal.build_username(),
            session_id: format!("console-{}", std::process::id()),
        })
    }
}

/// No matchmaking REST backend on the console; queries only log.
struct OfflineDirectory;

impl Directory for OfflineDirectory {
    async fn search(
        &self,
        query: &str,
    ) -> Result<Vec<SearchHit>, DirectoryError> {
        tracing::info!(query, "no directory backend; search returns nothing");
        Ok(Vec::new())
    }

    async fn request_game(
        &self,
        opponent_id: &str,
    ) -> Result<(), DirectoryError> {
        tracing::info!(opponent_id, "no directory backend; request dropped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Console view
// ---------------------------------------------------------------------------

struct ConsoleView;

impl View for ConsoleView {
    fn show_screen(&mut self, phase: MatchPhase) {
        let line = match phase {
            MatchPhase::LoggedOut => "logged out",
            MatchPhase::Authenticating => "logging in...",
            MatchPhase::Searching => "waiting for an opponent",
            MatchPhase::AwaitingOpponent => "opponent found, match starting",
            MatchPhase::MyTurn => "your turn",
            MatchPhase::OpponentTurn => "opponent's turn",
            MatchPhase::Ended => "game over",
        };
        println!("== {line} ==");
    }

    fn render_board(&mut self, board: &RenderedBoard) {
        // Opponent's row reads right to left so the sowing direction is
        // counter-clockwise on screen, like on a physical board.
        print!("      ");
        for pit in board.opponent[..6].iter().rev() {
            print!("[{pit:>2}] ");
        }
        println!();
        println!(
            "({:>2})                                ({:>2})",
            board.opponent_store(),
            board.own_store()
        );
        print!("      ");
        for pit in &board.own[..6] {
            print!("[{pit:>2}] ");
        }
        println!();
        println!("        1    2    3    4    5    6");
    }

    fn render_search_results(&mut self, hits: &[SearchHit]) {
        if hits.is_empty() {
            println!("(no players found)");
            return;
        }
        for hit in hits {
            println!("  {}  ({})", hit.display_name, hit.user_id);
        }
    }

    fn set_opponent_label(&mut self, name: &str) {
        println!("playing against {name}");
    }

    fn set_move_enabled(&mut self, enabled: bool) {
        if enabled {
            println!("pick a pit: move <1-6>");
        }
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let url = std::env::var("KALAHA_URL")
        .unwrap_or_else(|_| "ws://127.0.0.1:8080/game".into());

    let mut session = MatchSession::new(ConsoleView, OfflineDirectory);
    session.login(&EnvAuthenticator, &LocalBroker).await?;

    eprintln!("connecting to {url}");
    let conn = WebSocketConnection::connect(&url).await?;
    let mut events = session.attach(conn).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                session.handle_event(event);
                if session.phase() == MatchPhase::LoggedOut {
                    eprintln!("connection lost");
                    break;
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_command(&mut session, line.trim()).await {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn handle_command<C, V, D>(
    session: &mut MatchSession<C, V, D>,
    line: &str,
) -> bool
where
    C: kalaha_transport::Connection + Clone,
    V: View,
    D: Directory,
{
    match line.split_once(' ') {
        Some(("move", pit)) => match pit.trim().parse::<u8>() {
            Ok(pit @ 1..=6) => session.submit_move(pit).await,
            _ => println!("usage: move <1-6>"),
        },
        Some(("search", query)) => {
            if session.search(query).await.is_err() {
                println!("search failed");
            }
        }
        Some(("invite", id)) => {
            if session.request_game(id.trim()).await.is_err() {
                println!("invite failed");
            }
        }
        None if line == "quit" => return false,
        None if line.is_empty() => {}
        _ => println!("commands: move <1-6>, search <name>, invite <id>, quit"),
    }
    true
}
