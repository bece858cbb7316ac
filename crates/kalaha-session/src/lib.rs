//! Session layer for the Kalaha client.
//!
//! This crate owns one open socket per match attempt and the identity
//! handshakes around it:
//!
//! 1. **Authentication** — asserting who the player is
//!    ([`Authenticator`] trait, implemented by the embedding application).
//! 2. **Session negotiation** — trading a [`Principal`] for an
//!    [`ActiveSession`] ([`SessionBroker`] trait).
//! 3. **Socket ownership** — [`SessionClient`]: sends the handshake as the
//!    very first frame, decodes inbound frames, and republishes them as
//!    [`SessionEvent`]s to a single consumer in arrival order.
//!
//! # How it fits in the stack
//!
//! ```text
//! Match state machine (above)  ← consumes SessionEvents, drives the view
//!     ↕
//! Session layer (this crate)   ← owns the socket and the turn flag
//!     ↕
//! Protocol / Transport (below) ← frame codec, duplex text channel
//! ```
//!
//! [`Principal`]: kalaha_protocol::Principal
//! [`ActiveSession`]: kalaha_protocol::ActiveSession

mod auth;
mod broker;
mod client;
mod error;

pub use auth::Authenticator;
pub use broker::SessionBroker;
pub use client::{SessionClient, SessionEvent};
pub use error::SessionError;
