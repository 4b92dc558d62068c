//! Backend response envelope and normalization.
//!
//! The backend answers either with the `{code, message, data, success}`
//! wrapper or with a bare JSON payload. Every response is classified into
//! one of those two shapes at the boundary and normalized into a single
//! canonical [`Envelope`], so callers never branch on wrapper presence.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BusinessError, Error};

/// The canonical response envelope.
///
/// `code == 200` or `success == true` means logical success. Paginated
/// endpoints carry an extra `pagination` block beside `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Envelope {
    /// Wrap a bare payload as a successful envelope.
    pub fn wrap(body: Value) -> Self {
        Self {
            code: 200,
            message: String::new(),
            data: Some(body),
            success: true,
            pagination: None,
        }
    }

    /// Whether the envelope signals logical success.
    pub fn is_success(&self) -> bool {
        self.code == 200 || self.success
    }

    /// Reject logical failures with the backend's message.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.is_success() {
            return Ok(self);
        }
        let message = if self.message.is_empty() {
            "request failed".to_string()
        } else {
            self.message.clone()
        };
        Err(BusinessError {
            code: self.code,
            message,
        }
        .into())
    }

    /// Deserialize the `data` field into a typed value.
    ///
    /// A missing `data` field decodes as JSON `null`, which succeeds for
    /// optional targets and fails loudly for required ones.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, Error> {
        let data = self.data.unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}

/// Classification of a raw response body.
///
/// An object carrying a `code` field is treated as enveloped; everything
/// else is a bare payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Enveloped(Envelope),
    Bare(Value),
}

impl Payload {
    /// Produce the canonical envelope: enveloped bodies pass through,
    /// bare bodies are wrapped as `code = 200, success = true`.
    pub fn normalize(self) -> Envelope {
        match self {
            Payload::Enveloped(envelope) => envelope,
            Payload::Bare(body) => Envelope::wrap(body),
        }
    }
}

/// Pagination block attached to list envelopes.
///
/// The backend has emitted both camelCase and snake_case key spellings;
/// both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(alias = "pageSize")]
    pub page_size: u32,
    pub total: u64,
    #[serde(alias = "totalPages")]
    pub total_pages: u32,
}

/// One field-level error from a 422 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}
