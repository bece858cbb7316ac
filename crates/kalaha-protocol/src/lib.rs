//! Wire protocol for the Kalaha match service.
//!
//! This crate defines the "language" spoken over the match socket and the
//! identity types that cross the session REST boundary:
//!
//! - **Codec** ([`ServerEvent`], [`ClientFrame`]) — the line-oriented text
//!   frames and their typed decode/encode.
//! - **Types** ([`Principal`], [`ActiveSession`], [`SearchHit`]) — identity
//!   and matchmaking data, serialized as camelCase JSON.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw text frames) and session
//! (socket ownership). It knows nothing about connections or screens —
//! it only translates strings into tagged variants and back.
//!
//! ```text
//! Transport (text) → Protocol (ServerEvent) → Session (socket context)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{
    BOARD_PREFIX, ClientFrame, END_FRAME, INSTRUCTION_PREFIX,
    OPPONENT_PREFIX, ServerEvent, TURN_DENIED_FRAME, TURN_GRANTED_FRAME,
    WAITING_FRAME,
};
pub use error::ProtocolError;
pub use types::{ActiveSession, Principal, SearchHit};
