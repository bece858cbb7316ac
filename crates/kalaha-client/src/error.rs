//! Unified error type for the Kalaha client SDK.

use kalaha_protocol::ProtocolError;
use kalaha_session::SessionError;
use kalaha_transport::TransportError;

use crate::DirectoryError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `kalaha-client` crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum KalahaError {
    /// A transport-level error (dial, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (malformed frame payload).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (authentication, negotiation, handshake).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A matchmaking directory error (search, game request).
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The socket was attached before a session was negotiated.
    #[error("no negotiated session; log in first")]
    NotAuthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let kalaha_err: KalahaError = err.into();
        assert!(matches!(kalaha_err, KalahaError::Transport(_)));
        assert!(kalaha_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::WrongPitCount { found: 3 };
        let kalaha_err: KalahaError = err.into();
        assert!(matches!(kalaha_err, KalahaError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let kalaha_err: KalahaError = err.into();
        assert!(matches!(kalaha_err, KalahaError::Session(_)));
    }

    #[test]
    fn test_from_directory_error() {
        let err = DirectoryError::Unauthorized;
        let kalaha_err: KalahaError = err.into();
        assert!(matches!(kalaha_err, KalahaError::Directory(_)));
    }
}
