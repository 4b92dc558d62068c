//! `/auth/*` endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use tally_core::Result;
use tally_core::model::User;
use tally_core::types::Credential;

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const LOGOUT: &str = "/auth/logout";
pub const ME: &str = "/auth/me";
pub const REFRESH: &str = "/auth/refresh";
pub const CHANGE_PASSWORD: &str = "/auth/change-password";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";

/// Login form. The password is hidden from `Debug` output.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Hide the password in Debug output
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form. The password is hidden from `Debug` output.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// Hide the password in Debug output
impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Credential plus profile returned by login, register, and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(flatten)]
    pub credential: Credential,
    pub user: User,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthPayload> {
    client
        .post(LOGIN, request, RequestOptions::unauthenticated())
        .await?
        .data()
}

pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<AuthPayload> {
    client
        .post(REGISTER, request, RequestOptions::unauthenticated())
        .await?
        .data()
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    client
        .post_empty(LOGOUT, RequestOptions::silent())
        .await
        .map(|_| ())
}

pub async fn me(client: &ApiClient) -> Result<User> {
    client.get(ME, RequestOptions::default()).await?.data()
}

/// Exchange a refresh token for a fresh credential.
pub async fn refresh(client: &ApiClient, refresh_token: &str) -> Result<Credential> {
    client
        .post(
            REFRESH,
            &RefreshRequest { refresh_token },
            RequestOptions::unauthenticated().without_loading(),
        )
        .await?
        .data()
}

pub async fn change_password(client: &ApiClient, request: &ChangePasswordRequest) -> Result<()> {
    client
        .post(CHANGE_PASSWORD, request, RequestOptions::default())
        .await
        .map(|_| ())
}

pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<()> {
    #[derive(Serialize)]
    struct Body<'a> {
        email: &'a str,
    }
    client
        .post(FORGOT_PASSWORD, &Body { email }, RequestOptions::unauthenticated())
        .await
        .map(|_| ())
}

pub async fn reset_password(client: &ApiClient, token: &str, new_password: &str) -> Result<()> {
    #[derive(Serialize)]
    struct Body<'a> {
        token: &'a str,
        new_password: &'a str,
    }
    client
        .post(
            RESET_PASSWORD,
            &Body {
                token,
                new_password,
            },
            RequestOptions::unauthenticated(),
        )
        .await
        .map(|_| ())
}
