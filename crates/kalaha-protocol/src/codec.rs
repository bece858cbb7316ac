//! Typed decode/encode for the line-oriented match protocol.
//!
//! The wire format is a flat set of string literals and prefixed payloads:
//! no binary framing, no length prefixes — message boundaries are socket
//! frame boundaries, one protocol event per text frame. The literals are
//! kept byte-for-byte compatible with the existing server and modeled as
//! tagged variants immediately after decoding, so nothing past this module
//! ever sniffs prefixes again.
//!
//! Matching is ordered and exclusive: the `opponent=` and `$$` prefixes are
//! tried before the exact-match literals, and `##turn` / `##~turn` are
//! compared by full equality — never by prefix — so neither can shadow the
//! other (or an outbound-style `##<digit>` frame echoed by a buggy peer).

use kalaha_board::{BoardState, PIT_COUNT};

use crate::{ActiveSession, ProtocolError};

/// Prefix of the match-found frame; the remainder is the opponent's name.
pub const OPPONENT_PREFIX: &str = "opponent=";
/// Exact frame: queued for matchmaking, or match reset by the server.
pub const WAITING_FRAME: &str = "wait-for-game";
/// Prefix shared by game instructions, inbound and outbound.
pub const INSTRUCTION_PREFIX: &str = "##";
/// Exact frame: it is this client's turn.
pub const TURN_GRANTED_FRAME: &str = "##turn";
/// Exact frame: it is the opponent's turn.
pub const TURN_DENIED_FRAME: &str = "##~turn";
/// Prefix of the board snapshot frame; the remainder is 14 dash-joined
/// pit counts.
pub const BOARD_PREFIX: &str = "$$";
/// Exact frame: the match has concluded.
pub const END_FRAME: &str = "end";

const BOARD_SEPARATOR: char = '-';

// ---------------------------------------------------------------------------
// ServerEvent — inbound frames
// ---------------------------------------------------------------------------

/// A decoded server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A match was found; carries the opponent's display name.
    OpponentAssigned {
        /// Display name as sent by the server.
        opponent: String,
    },
    /// The client is queued (or was returned to the queue after the
    /// pending match fell apart).
    WaitingForMatch,
    /// It is the local player's turn.
    TurnGranted,
    /// It is the opponent's turn.
    TurnDenied,
    /// A full board snapshot in wire orientation.
    BoardUpdate(BoardState),
    /// The match concluded.
    MatchEnded,
    /// A frame this client version does not know. Fails soft: the protocol
    /// is forward-compatible, so unknown frames are discarded upstream
    /// rather than treated as fatal.
    Unrecognized,
}

impl ServerEvent {
    /// Decodes one inbound text frame.
    ///
    /// # Errors
    /// Only a *recognized* frame with a malformed payload errors — today
    /// that means a `$$` board snapshot whose counts don't parse. Unknown
    /// frames come back as [`ServerEvent::Unrecognized`] instead.
    pub fn decode(frame: &str) -> Result<ServerEvent, ProtocolError> {
        if let Some(opponent) = frame.strip_prefix(OPPONENT_PREFIX) {
            return Ok(ServerEvent::OpponentAssigned {
                opponent: opponent.to_string(),
            });
        }
        if let Some(raw) = frame.strip_prefix(BOARD_PREFIX) {
            return Ok(ServerEvent::BoardUpdate(parse_board(raw)?));
        }
        Ok(match frame {
            WAITING_FRAME => ServerEvent::WaitingForMatch,
            TURN_GRANTED_FRAME => ServerEvent::TurnGranted,
            TURN_DENIED_FRAME => ServerEvent::TurnDenied,
            END_FRAME => ServerEvent::MatchEnded,
            _ => ServerEvent::Unrecognized,
        })
    }
}

/// Parses the payload of a board snapshot: 14 dash-joined integers.
fn parse_board(raw: &str) -> Result<BoardState, ProtocolError> {
    let parts: Vec<&str> = raw.split(BOARD_SEPARATOR).collect();
    if parts.len() != PIT_COUNT {
        return Err(ProtocolError::WrongPitCount { found: parts.len() });
    }

    let mut pits = [0u32; PIT_COUNT];
    for (pit, part) in pits.iter_mut().zip(&parts) {
        // Digits only: `u32::parse` alone would also take a leading `+`,
        // which the wire format never produces.
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::InvalidPitCount {
                value: (*part).to_string(),
            });
        }
        *pit = part.parse().map_err(|_| ProtocolError::InvalidPitCount {
            value: (*part).to_string(),
        })?;
    }
    Ok(BoardState(pits))
}

// ---------------------------------------------------------------------------
// ClientFrame — outbound frames
// ---------------------------------------------------------------------------

/// An outbound frame to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// `"{userId}={sessionId}"` — sent exactly once, as the very first
    /// frame after the socket opens.
    Handshake(ActiveSession),
    /// `"##{pitIndex}"` — a move, carrying the visual pit index (1–6).
    /// The server normalizes it into wire orientation; the client performs
    /// no legality checks.
    Move(u8),
}

impl ClientFrame {
    /// Renders the frame as wire text.
    pub fn encode(&self) -> String {
        match self {
            ClientFrame::Handshake(session) => {
                format!("{}={}", session.user_id, session.session_id)
            }
            ClientFrame::Move(pit) => {
                format!("{INSTRUCTION_PREFIX}{pit}")
            }
        }
    }
}
