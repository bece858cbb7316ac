//! Identity and matchmaking types.
//!
//! These are the structures that cross the session REST boundary in
//! camelCase JSON. The game socket itself speaks the plain-text frames in
//! [`codec`](crate::codec) — nothing here travels over it except the two
//! fields of [`ActiveSession`] baked into the handshake frame.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity asserted by the external authentication provider.
///
/// Produced exactly once per login and consumed by session creation;
/// immutable after that. The `token` is the provider's access token and is
/// forwarded verbatim for server-side verification — this crate never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Which identity provider vouched for this user (e.g. `"facebook"`).
    pub provider_id: String,
    /// The user's identifier within that provider.
    pub principal_id: String,
    /// Human-readable name, used for labels only.
    pub display_name: String,
    /// Provider access token, opaque to the client.
    pub token: String,
}

impl Principal {
    /// The provider-qualified username, `"{providerId}:{principalId}"`.
    ///
    /// This is the shape user ids take everywhere else in the protocol.
    pub fn build_username(&self) -> String {
        format!("{}:{}", self.provider_id, self.principal_id)
    }
}

/// A server-issued session pairing.
///
/// Created by session negotiation, owned exclusively by the session client,
/// and never mutated. Its only wire appearance is the handshake frame
/// `"{userId}={sessionId}"` sent as the first message on the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Provider-qualified user id (see [`Principal::build_username`]).
    pub user_id: String,
    /// Opaque session identifier issued by the server.
    pub session_id: String,
}

impl fmt::Display for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The session id is a credential; keep it out of log lines.
        write!(f, "session for {}", self.user_id)
    }
}

/// One entry of an opponent search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Provider-qualified user id to hand to a game request.
    pub user_id: String,
    /// Name to show in the result list.
    pub display_name: String,
}
