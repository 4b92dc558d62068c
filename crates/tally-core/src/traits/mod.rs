//! Capability traits at the client/session seam.
//!
//! The request client never depends on the full session store. It reads
//! credentials through [`TokenProvider`] and reports invalidated sessions
//! through [`SessionGuard`]; UI concerns flow through [`NoticeSink`] and
//! [`LoadingSink`]. Implementations are injected at construction, which
//! keeps the bidirectional client/session dependency a pair of narrow,
//! explicit interfaces.

mod session;
mod ui;

pub use session::{SessionGuard, TokenProvider};
pub use ui::{LoadingSink, Notice, NoticeKind, NoticeSink, NullSink};
