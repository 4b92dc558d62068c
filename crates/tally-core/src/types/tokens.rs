//! Credential token types.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How close to expiry a token counts as "expiring soon".
const EXPIRY_MARGIN_SECS: i64 = 5 * 60;

/// A bearer access token for authenticated requests.
///
/// Access tokens are short-lived JWTs. Only the embedded `exp` claim is
/// inspected; everything else is treated as opaque. The value is never
/// shown in `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token value, for use in authorization headers only.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The expiry instant from the `exp` claim, if the token parses.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = decode_claims(&self.0)?.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    /// Whether the token has expired.
    ///
    /// Fails open: a token whose claims do not parse is reported as
    /// expired, forcing re-authentication over trusting a corrupt token.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at < Utc::now(),
            None => true,
        }
    }

    /// Whether the token expires within the next five minutes.
    pub fn expires_soon(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => (expires_at - Utc::now()).num_seconds() < EXPIRY_MARGIN_SECS,
            None => true,
        }
    }

    /// The `sub` claim (the username), if present.
    pub fn subject(&self) -> Option<String> {
        Some(decode_claims(&self.0)?.get("sub")?.as_str()?.to_string())
    }

    /// The `user_id` claim, if present.
    pub fn user_id(&self) -> Option<i64> {
        decode_claims(&self.0)?.get("user_id")?.as_i64()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Longer-lived than access tokens and treated as fully opaque. The value
/// is never shown in `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token value, for use in refresh requests only.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The access/refresh token pair identifying an authenticated session.
///
/// Matches the backend's token payload on the wire.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    #[serde(default = "bearer")]
    pub token_type: String,
}

impl Credential {
    pub fn new(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: bearer(),
        }
    }

    /// The expiry instant of the access token, if its claims parse.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.access_token.expires_at()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn bearer() -> String {
    "bearer".to_string()
}

/// Decode the claims segment of a JWT without verifying the signature.
fn decode_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
