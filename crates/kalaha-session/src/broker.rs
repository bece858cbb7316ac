//! Session negotiation hook.
//!
//! After authentication, the principal is traded for a server-issued
//! session pairing. In production this is an HTTP call (`POST /session`
//! with the camelCase [`Principal`] body); in tests it is a stub. Either
//! way the client only sees this trait.
//!
//! [`Principal`]: kalaha_protocol::Principal

use kalaha_protocol::{ActiveSession, Principal};

use crate::SessionError;

/// Negotiates an [`ActiveSession`] for an authenticated principal.
///
/// The resulting session is consumed exactly once, by
/// [`SessionClient::open`](crate::SessionClient::open), which bakes it
/// into the socket handshake frame. Its lifetime is one connection
/// attempt: a new login negotiates a new session.
pub trait SessionBroker: Send + Sync + 'static {
    /// Creates a session for the given principal.
    ///
    /// # Returns
    /// - `Ok(ActiveSession)` — the server accepted the principal's token
    /// - `Err(SessionError::SessionRejected)` — the token was refused or
    ///   the negotiation call failed
    fn create_session(
        &self,
        principal: &Principal,
    ) -> impl std::future::Future<Output = Result<ActiveSession, SessionError>> + Send;
}
