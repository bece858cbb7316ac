//! Error types for the protocol layer.
//!
//! Decode failures are deliberately non-fatal to the connection: the
//! protocol is forward-compatible, so an undecodable frame is logged and
//! discarded by the consumer, never escalated. The error still names what
//! was wrong so the log line is useful.

use kalaha_board::PIT_COUNT;

/// Errors that can occur while decoding a wire frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A board snapshot frame carried the wrong number of pit counts.
    #[error("board frame has {found} pit counts, expected {PIT_COUNT}")]
    WrongPitCount {
        /// How many `-`-separated values the frame actually carried.
        found: usize,
    },

    /// A board snapshot frame carried a value that is not a non-negative
    /// integer.
    #[error("invalid pit count {value:?} in board frame")]
    InvalidPitCount {
        /// The offending token, verbatim.
        value: String,
    },
}
