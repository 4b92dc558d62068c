//! tally-core - Core types and traits for the tally personal-finance client.
//!
//! Transport-free building blocks shared by every tally crate: the error
//! taxonomy, the backend response envelope and its normalization, validated
//! base URLs, credential token types, the wire-level domain model, and the
//! narrow capability traits that break the request-client / session-store
//! dependency cycle.

pub mod envelope;
pub mod error;
pub mod model;
pub mod traits;
pub mod types;

// Re-export primary types at crate root for convenience
pub use envelope::{Envelope, FieldError, Pagination, Payload};
pub use error::Error;
pub use traits::{LoadingSink, Notice, NoticeKind, NoticeSink, SessionGuard, TokenProvider};
pub use types::{AccessToken, BaseUrl, Credential, RefreshToken};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
