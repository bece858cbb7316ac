//! # Kalaha client
//!
//! The top layer of the Kalaha client stack: the [`MatchSession`] state
//! machine that turns decoded server events and user actions into phase
//! transitions and view updates.
//!
//! The embedding application supplies the seams — a [`View`] for the
//! screen, a [`Directory`] for matchmaking calls, an `Authenticator` and
//! `SessionBroker` for login — and pumps session events into the machine:
//!
//! ```rust,no_run
//! use kalaha_client::prelude::*;
//! # use kalaha_transport::WebSocketConnection;
//! # async fn run<V: View, D: Directory, A: Authenticator, B: SessionBroker>(
//! #     view: V, directory: D, auth: A, broker: B,
//! # ) -> Result<(), KalahaError> {
//! let mut session = MatchSession::new(view, directory);
//! session.login(&auth, &broker).await?;
//!
//! let conn = WebSocketConnection::connect("ws://localhost:8080/game").await?;
//! let mut events = session.attach(conn).await?;
//! while let Some(event) = events.recv().await {
//!     session.handle_event(event);
//! }
//! # Ok(())
//! # }
//! ```

mod directory;
mod error;
mod machine;
mod view;

pub use directory::{Directory, DirectoryError};
pub use error::KalahaError;
pub use machine::{MatchPhase, MatchSession};
pub use view::View;

/// Everything an embedding application typically needs.
pub mod prelude {
    pub use crate::{
        Directory, DirectoryError, KalahaError, MatchPhase, MatchSession,
        View,
    };
    pub use kalaha_board::{BoardState, RenderedBoard, Side};
    pub use kalaha_protocol::{ActiveSession, Principal, SearchHit};
    pub use kalaha_session::{
        Authenticator, SessionBroker, SessionClient, SessionEvent,
    };
}
