//! Error types for the session layer.

/// Errors that can occur while establishing or running a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The user is not logged into the identity provider, or the provider
    /// rejected the login outright.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The user is logged into the provider but has not authorized this
    /// application.
    #[error("application not authorized by the identity provider")]
    NotAuthorized,

    /// Session negotiation failed — the server refused to trade the
    /// principal for a session (invalid token, server error).
    #[error("session rejected: {0}")]
    SessionRejected(String),

    /// The underlying connection failed. Carries the transport's message
    /// rather than its type, since the connection implementation is
    /// pluggable.
    #[error("transport failure: {0}")]
    Transport(String),
}
