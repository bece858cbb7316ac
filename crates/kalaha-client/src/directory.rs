//! The matchmaking directory seam.
//!
//! Searching for opponents and requesting a game are REST calls in the
//! reference deployment. The state machine only sees this trait; the
//! match itself starts later, server-side, via an `opponent=` frame on
//! the socket.

use kalaha_protocol::SearchHit;

/// Errors from the matchmaking directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The session behind the call is no longer valid.
    #[error("directory call rejected: session not authorized")]
    Unauthorized,

    /// The call failed for any other reason (network, server error).
    #[error("directory call failed: {0}")]
    RequestFailed(String),
}

/// Finds opponents and issues game requests.
pub trait Directory: Send + Sync + 'static {
    /// Searches online players by display name fragment.
    ///
    /// Returns hits in the server's order. The caller applies the query
    /// policy (minimum length, duplicate suppression, staleness) — this
    /// trait is a dumb pipe.
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, DirectoryError>> + Send;

    /// Asks the server to invite `opponent_id` to a game.
    ///
    /// An `Ok` is only an acknowledgement that the request was relayed;
    /// the match (if the opponent accepts) begins with an `opponent=`
    /// frame on the socket.
    fn request_game(
        &self,
        opponent_id: &str,
    ) -> impl std::future::Future<Output = Result<(), DirectoryError>> + Send;
}
