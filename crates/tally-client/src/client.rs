//! HTTP request/response pipeline.
//!
//! Every backend call goes through the same tail: bearer attachment,
//! loading accounting, envelope normalization, and the status-code
//! branch table, so callers never branch on wrapper presence or
//! duplicate error surfacing.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use tally_core::envelope::{Envelope, FieldError, Payload};
use tally_core::error::{
    AuthError, Error, HttpError, StorageError, TransportError, ValidationError,
};
use tally_core::traits::Notice;
use tally_core::types::BaseUrl;

use crate::context::ClientContext;
use crate::options::RequestOptions;

/// Fixed global timeout; no per-request override.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the first 401 waits for concurrent failures to coalesce
/// before surfacing the notice and redirecting.
const REDIRECT_SETTLE: Duration = Duration::from_millis(100);

/// HTTP client for the tally backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: BaseUrl,
    ctx: Arc<ClientContext>,
}

impl ApiClient {
    /// Create a new client for the given backend base URL.
    pub fn new(base: BaseUrl, ctx: Arc<ClientContext>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self { http, base, ctx }
    }

    /// The backend base URL this client is configured for.
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// The shared runtime context.
    pub fn context(&self) -> &Arc<ClientContext> {
        &self.ctx
    }

    pub async fn get(&self, path: &str, opts: RequestOptions) -> Result<Envelope, Error> {
        self.request(Method::GET, path, None::<&()>, None::<&()>, opts)
            .await
    }

    /// GET with query parameters.
    pub async fn get_query<Q>(
        &self,
        path: &str,
        query: &Q,
        opts: RequestOptions,
    ) -> Result<Envelope, Error>
    where
        Q: Serialize,
    {
        self.request(Method::GET, path, Some(query), None::<&()>, opts)
            .await
    }

    pub async fn post<B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<Envelope, Error>
    where
        B: Serialize,
    {
        self.request(Method::POST, path, None::<&()>, Some(body), opts)
            .await
    }

    /// POST with no request body (logout and similar endpoints).
    pub async fn post_empty(&self, path: &str, opts: RequestOptions) -> Result<Envelope, Error> {
        self.request(Method::POST, path, None::<&()>, None::<&()>, opts)
            .await
    }

    pub async fn put<B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<Envelope, Error>
    where
        B: Serialize,
    {
        self.request(Method::PUT, path, None::<&()>, Some(body), opts)
            .await
    }

    pub async fn patch<B>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Envelope, Error>
    where
        B: Serialize,
    {
        self.request(Method::PATCH, path, None::<&()>, Some(body), opts)
            .await
    }

    pub async fn delete(&self, path: &str, opts: RequestOptions) -> Result<Envelope, Error> {
        self.request(Method::DELETE, path, None::<&()>, None::<&()>, opts)
            .await
    }

    /// POST a multipart form (file upload).
    #[instrument(skip(self, form), fields(base = %self.base))]
    pub async fn upload(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        opts: RequestOptions,
    ) -> Result<Envelope, Error> {
        debug!(path, "upload");
        let req = self.http.post(self.base.endpoint(path)).multipart(form);
        let response = self.send_raw(req, opts).await?;
        self.handle_response(response, path, opts).await
    }

    /// Fetch a binary payload and materialize it at `dest`.
    ///
    /// The payload lands in a temporary file beside `dest` first; the
    /// temporary is removed even when persisting fails.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn download(
        &self,
        path: &str,
        dest: &Path,
        opts: RequestOptions,
    ) -> Result<(), Error> {
        debug!(path, "download");
        let req = self.http.get(self.base.endpoint(path));
        let response = self.send_raw(req, opts).await?;

        let status = response.status();
        if !status.is_success() {
            return self
                .handle_error_status(status, response, path, opts)
                .await
                .map(|_| ());
        }

        let bytes = response.bytes().await.map_err(map_transport)?;

        let dir = dest.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
            .map_err(StorageError::Io)?;
        tmp.write_all(&bytes).map_err(StorageError::Io)?;
        tmp.persist(dest)
            .map_err(|e| Error::Storage(StorageError::Io(e.error)))?;

        Ok(())
    }

    #[instrument(skip(self, query, body), fields(base = %self.base))]
    async fn request<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
        opts: RequestOptions,
    ) -> Result<Envelope, Error>
    where
        Q: Serialize,
        B: Serialize,
    {
        debug!(%method, path, "dispatching request");

        let mut req = self.http.request(method, self.base.endpoint(path));
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = self.send_raw(req, opts).await?;
        self.handle_response(response, path, opts).await
    }

    /// Shared dispatch tail: bearer attachment, loading accounting, and
    /// transport-error surfacing. The counter is decremented as soon as
    /// the call settles, before any status handling.
    async fn send_raw(
        &self,
        mut req: reqwest::RequestBuilder,
        opts: RequestOptions,
    ) -> Result<reqwest::Response, Error> {
        if !opts.skip_auth {
            if let Some(token) = self.ctx.access_token() {
                req = req.header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
            }
        }

        if opts.show_loading {
            self.ctx.begin_request();
        }
        let result = req.send().await;
        if opts.show_loading {
            self.ctx.finish_request();
        }

        result.map_err(|err| {
            self.ctx
                .surface(Notice::error("network unreachable, check your connection"));
            map_transport(err)
        })
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
        path: &str,
        opts: RequestOptions,
    ) -> Result<Envelope, Error> {
        let status = response.status();
        trace!(status = %status, "backend response");

        if !status.is_success() {
            return self.handle_error_status(status, response, path, opts).await;
        }

        let payload = response.json::<Payload>().await.map_err(map_transport)?;
        match payload.normalize().into_result() {
            Ok(envelope) => Ok(envelope),
            Err(err) => {
                if opts.show_error {
                    self.ctx.surface(Notice::error(err.message()));
                }
                Err(err)
            }
        }
    }

    /// The status-code branch table for non-2xx responses. Every branch
    /// returns an error carrying the resolved message, so callers can
    /// still perform local recovery.
    async fn handle_error_status(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        path: &str,
        opts: RequestOptions,
    ) -> Result<Envelope, Error> {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let backend_message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        match status {
            StatusCode::UNAUTHORIZED => Err(self.handle_unauthenticated(path).await),
            StatusCode::FORBIDDEN => {
                let message = backend_message.unwrap_or_default();
                // Backend convention: some unauthenticated calls come back
                // as 403 with a "not authenticated" message.
                if message.to_ascii_lowercase().contains("not authenticated") {
                    return Err(self.handle_unauthenticated(path).await);
                }
                let message = if message.is_empty() {
                    "permission denied".to_string()
                } else {
                    message
                };
                self.ctx.surface(Notice::error(message.clone()));
                Err(HttpError::new(403, message).into())
            }
            StatusCode::NOT_FOUND => {
                let message = "requested resource does not exist";
                self.ctx.surface(Notice::error(message));
                Err(HttpError::new(404, message).into())
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let errors = body
                    .get("data")
                    .and_then(|data| serde_json::from_value::<Vec<FieldError>>(data.clone()).ok())
                    .unwrap_or_default();
                let err = ValidationError { errors };
                self.ctx.surface(Notice::error(err.joined()));
                Err(err.into())
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                let message = "internal server error";
                self.ctx.surface(Notice::error(message));
                Err(HttpError::new(500, message).into())
            }
            other => {
                let message = backend_message.unwrap_or_else(|| "network error".to_string());
                if opts.show_error {
                    self.ctx.surface(Notice::error(message.clone()));
                }
                Err(HttpError::new(other.as_u16(), message).into())
            }
        }
    }

    /// Single-flight 401 handling.
    ///
    /// The first failure claims the redirect gate, clears local session
    /// state immediately, waits briefly so concurrent failures coalesce,
    /// then surfaces the notice and redirects once. Losers of the race
    /// reject without side effects.
    async fn handle_unauthenticated(&self, path: &str) -> Error {
        if self.ctx.try_acquire_redirect() {
            warn!(path, "session rejected by backend, logging out");
            if let Some(guard) = self.ctx.guard() {
                guard.invalidate();
            }

            tokio::time::sleep(REDIRECT_SETTLE).await;

            self.ctx
                .surface(Notice::error("session expired, please sign in again"));
            if let Some(guard) = self.ctx.guard() {
                guard.redirect_to_login(Some(path));
            }
            self.ctx.release_redirect();
        }

        AuthError::SessionExpired.into()
    }
}

/// Map a reqwest failure into the transport taxonomy.
fn map_transport(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Other {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
