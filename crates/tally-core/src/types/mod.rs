//! Validated value types.

mod base_url;
mod tokens;

pub use base_url::BaseUrl;
pub use tokens::{AccessToken, Credential, RefreshToken};
