//! Session lifecycle: login, logout, refresh, startup restoration.
//!
//! The store has exactly two reachable states. Anonymous: no credential,
//! no user. Authenticated: persisted credential plus loaded profile.
//! Every failure path lands back in a clean Anonymous state; there is no
//! "unknown" state beyond the transient loading flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use tracing::{debug, info, instrument, warn};

use tally_core::Result;
use tally_core::error::AuthError;
use tally_core::model::User;
use tally_core::traits::SessionGuard;

use crate::api::auth::{self, LoginRequest, RegisterRequest};
use crate::client::ApiClient;
use crate::token_store::TokenStore;

type NavigateFn = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Holder of the current-user state and the auth operations around it.
///
/// Cheap to clone (internal `Arc`); constructing one installs it as the
/// client's session guard, closing the client/session cycle through the
/// narrow [`SessionGuard`] interface.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    tokens: Arc<TokenStore>,
    user: RwLock<Option<User>>,
    loading: AtomicBool,
    navigate: OnceLock<NavigateFn>,
}

impl SessionStore {
    /// Create the store and install it as the client's session guard.
    pub fn new(client: ApiClient, tokens: Arc<TokenStore>) -> Self {
        // Start from the cached profile so a restart shows the last-known
        // user until initialize_auth confirms or clears it.
        let cached_user = tokens.user();

        let store = Self {
            inner: Arc::new(SessionInner {
                client,
                tokens,
                user: RwLock::new(cached_user),
                loading: AtomicBool::new(false),
                navigate: OnceLock::new(),
            }),
        };

        store
            .inner
            .client
            .context()
            .install_guard(Arc::new(store.clone()));
        store
    }

    /// Register the navigation callback invoked on session expiry.
    /// Later calls are ignored.
    pub fn on_login_redirect(&self, navigate: impl Fn(Option<&str>) + Send + Sync + 'static) {
        let _ = self.inner.navigate.set(Box::new(navigate));
    }

    /// Whether a credential and a loaded user are both present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.access_token().is_some() && self.user().is_some()
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<User> {
        self.inner.user.read().unwrap().clone()
    }

    /// Whether startup restoration is still running.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Authenticate and transition to Authenticated.
    ///
    /// On failure the store stays Anonymous and the error propagates.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        info!("logging in");

        let payload = auth::login(&self.inner.client, &request).await?;
        self.inner.tokens.save(&payload.credential)?;
        self.inner.tokens.save_user(&payload.user)?;
        *self.inner.user.write().unwrap() = Some(payload.user.clone());

        debug!(user_id = payload.user.id, "login succeeded");
        Ok(payload.user)
    }

    /// Create an account and transition straight to Authenticated.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        info!("registering account");

        let payload = auth::register(&self.inner.client, &request).await?;
        self.inner.tokens.save(&payload.credential)?;
        self.inner.tokens.save_user(&payload.user)?;
        *self.inner.user.write().unwrap() = Some(payload.user.clone());

        Ok(payload.user)
    }

    /// Load the profile for the current credential.
    ///
    /// Failure leaves the credential untouched; the caller decides
    /// whether that is fatal.
    pub async fn fetch_user_info(&self) -> Result<User> {
        let user = auth::me(&self.inner.client).await?;
        self.inner.tokens.save_user(&user)?;
        *self.inner.user.write().unwrap() = Some(user.clone());
        Ok(user)
    }

    /// Best-effort server logout, then unconditional local teardown.
    ///
    /// Logout is a local-state guarantee: the backend call failing (or
    /// the network being down) never leaves the store Authenticated.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("logging out");

        if let Err(err) = auth::logout(&self.inner.client).await {
            warn!(error = %err, "backend logout failed, clearing local session anyway");
        }

        self.clear_local()
    }

    /// Exchange the persisted refresh token for a fresh credential.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self
            .inner
            .tokens
            .refresh_token()
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let credential = auth::refresh(&self.inner.client, refresh_token.as_str()).await?;
        self.inner.tokens.save(&credential)?;

        debug!("credential refreshed");
        Ok(())
    }

    /// Restore authentication state at process start.
    ///
    /// A valid persisted token is confirmed against the profile endpoint;
    /// an expired one goes through a refresh first. Any failure lands in
    /// a clean Anonymous state and is not propagated; an anonymous start
    /// is a normal outcome, not an error.
    #[instrument(skip(self))]
    pub async fn initialize_auth(&self) -> Result<()> {
        self.inner.loading.store(true, Ordering::SeqCst);
        let result = self.restore().await;
        self.inner.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn restore(&self) -> Result<()> {
        let Some(token) = self.inner.tokens.access_token() else {
            return self.clear_local();
        };

        if token.is_expired() {
            debug!("persisted token expired, attempting refresh");
            if let Err(err) = self.refresh().await {
                warn!(error = %err, "token refresh failed");
                return self.clear_local();
            }
        }

        if let Err(err) = self.fetch_user_info().await {
            warn!(error = %err, "could not restore user profile");
            return self.clear_local();
        }

        debug!("session restored");
        Ok(())
    }

    fn clear_local(&self) -> Result<()> {
        self.inner.tokens.clear()?;
        *self.inner.user.write().unwrap() = None;
        Ok(())
    }
}

impl SessionGuard for SessionStore {
    fn invalidate(&self) {
        // Local teardown only; a stale credential must not linger for
        // follow-up requests.
        if let Err(err) = self.inner.tokens.clear() {
            warn!(error = %err, "failed to clear stored tokens");
        }
        *self.inner.user.write().unwrap() = None;
    }

    fn redirect_to_login(&self, return_to: Option<&str>) {
        if let Some(navigate) = self.inner.navigate.get() {
            navigate(return_to);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("loading", &self.is_loading())
            .finish()
    }
}
