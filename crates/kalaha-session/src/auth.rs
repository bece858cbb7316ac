//! Authentication hook for asserting player identity.
//!
//! The client does not implement the identity-provider handshake itself —
//! that belongs to the embedding application (a browser SDK, an OAuth
//! flow, a test stub). The client only defines the [`Authenticator`]
//! trait: one async call that either produces a [`Principal`] or explains
//! why there isn't one.
//!
//! [`Principal`]: kalaha_protocol::Principal

use kalaha_protocol::Principal;

use crate::SessionError;

/// Asserts the local player's identity via an external provider.
///
/// Called once at the start of the login workflow. The returned
/// [`Principal`] is immutable and is consumed by session negotiation
/// ([`SessionBroker`](crate::SessionBroker)).
///
/// # Example
///
/// ```rust
/// use kalaha_session::{Authenticator, SessionError};
/// use kalaha_protocol::Principal;
///
/// /// Mints a fixed identity. Only for development and tests.
/// struct StubAuthenticator;
///
/// impl Authenticator for StubAuthenticator {
///     async fn authenticate(&self) -> Result<Principal, SessionError> {
///         Ok(Principal {
///             provider_id: "stub".into(),
///             principal_id: "1".into(),
///             display_name: "Dev Player".into(),
///             token: "dev-token".into(),
///         })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Runs the provider login and returns the asserted identity.
    ///
    /// # Returns
    /// - `Ok(Principal)` — the provider vouched for the user
    /// - `Err(SessionError::NotAuthorized)` — logged into the provider,
    ///   but this application was not granted access
    /// - `Err(SessionError::AuthFailed)` — not logged in, or the provider
    ///   call failed
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<Principal, SessionError>> + Send;
}
