//! tally-client - reqwest-backed client for the tally personal-finance backend.
//!
//! Everything flows through one [`ApiClient`]: it attaches credentials,
//! normalizes response envelopes, drives the shared loading indicator, and
//! funnels unauthenticated responses into a single redirect. Session state
//! lives in [`SessionStore`]; credentials persist through [`TokenStore`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tally_client::{ApiClient, ClientContext, SessionStore, TokenStore};
//! use tally_client::api::auth::LoginRequest;
//! use tally_core::BaseUrl;
//!
//! # async fn example() -> tally_core::Result<()> {
//! let tokens = Arc::new(TokenStore::open_default()?);
//! let ctx = Arc::new(ClientContext::new(tokens.clone()));
//! let client = ApiClient::new(BaseUrl::from_env()?, ctx);
//! let session = SessionStore::new(client.clone(), tokens);
//!
//! session.initialize_auth().await?;
//! if !session.is_authenticated() {
//!     session.login(LoginRequest::new("alice", "secret")).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod context;
pub mod options;
pub mod session;
pub mod stores;
pub mod token_store;

pub use client::ApiClient;
pub use context::ClientContext;
pub use options::RequestOptions;
pub use session::SessionStore;
pub use token_store::TokenStore;

pub use tally_core::{Envelope, Error, Result};
