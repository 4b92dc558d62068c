//! Session-side capabilities consumed by the request client.

use crate::types::AccessToken;

/// Read-only access to the current access token.
pub trait TokenProvider: Send + Sync {
    /// The current access token, if one is held.
    fn access_token(&self) -> Option<AccessToken>;
}

/// Callbacks invoked when the backend reports the session is no longer
/// valid.
///
/// Both callbacks are local-state operations and must not perform network
/// I/O; the 401 that triggered them already proved the credential dead.
pub trait SessionGuard: Send + Sync {
    /// Clear local session state without a server round trip.
    fn invalidate(&self);

    /// Navigate to the login surface.
    ///
    /// `return_to` is the path the failed request originated from, so the
    /// embedding application can come back after re-authentication.
    fn redirect_to_login(&self, return_to: Option<&str>);
}
