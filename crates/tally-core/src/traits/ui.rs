//! User-facing surface capabilities.

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing notice emitted by the request pipeline or a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

/// Receives user-facing notices.
pub trait NoticeSink: Send + Sync {
    fn surface(&self, notice: Notice);
}

/// Observes the shared loading indicator.
///
/// `loading_started` fires when the first counted request goes in flight,
/// `loading_finished` when the last one settles.
pub trait LoadingSink: Send + Sync {
    fn loading_started(&self);
    fn loading_finished(&self);
}

/// No-op sinks for headless or test use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NoticeSink for NullSink {
    fn surface(&self, _notice: Notice) {}
}

impl LoadingSink for NullSink {
    fn loading_started(&self) {}
    fn loading_finished(&self) {}
}
