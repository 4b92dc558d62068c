//! Per-request behavior flags.

/// Flags controlling how a single request interacts with the shared
/// loading indicator, error surfacing, and credential attachment.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Do not attach the bearer credential.
    pub skip_auth: bool,
    /// Count this request toward the shared loading indicator.
    pub show_loading: bool,
    /// Surface backend error messages as user-facing notices.
    pub show_error: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            skip_auth: false,
            show_loading: true,
            show_error: true,
        }
    }
}

impl RequestOptions {
    /// Options for endpoints that must not carry a credential (login,
    /// register, forgot-password).
    pub fn unauthenticated() -> Self {
        Self {
            skip_auth: true,
            ..Self::default()
        }
    }

    /// Options for background calls: no loading indicator, no notices.
    pub fn silent() -> Self {
        Self {
            skip_auth: false,
            show_loading: false,
            show_error: false,
        }
    }

    pub fn without_loading(mut self) -> Self {
        self.show_loading = false;
        self
    }

    pub fn without_error_notice(mut self) -> Self {
        self.show_error = false;
        self
    }
}
