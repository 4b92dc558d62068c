//! Process-wide client runtime state.
//!
//! The pending-request counter and the 401 redirect gate are explicit
//! fields on this context object rather than free module state, so
//! initialization order stays visible and tests get isolated instances.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tally_core::traits::{LoadingSink, Notice, NoticeSink, NullSink, SessionGuard, TokenProvider};
use tally_core::types::AccessToken;

/// Shared state injected into every [`ApiClient`](crate::ApiClient).
pub struct ClientContext {
    pending: AtomicUsize,
    redirect_gate: AtomicBool,
    tokens: Arc<dyn TokenProvider>,
    notices: Arc<dyn NoticeSink>,
    loading: Arc<dyn LoadingSink>,
    // Installed after construction; the session store needs the client to
    // exist before it can exist itself.
    guard: OnceLock<Arc<dyn SessionGuard>>,
}

impl ClientContext {
    /// A context with no-op UI sinks, for headless use and tests.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_sinks(tokens, Arc::new(NullSink), Arc::new(NullSink))
    }

    /// A context wired to real notice and loading sinks.
    pub fn with_sinks(
        tokens: Arc<dyn TokenProvider>,
        notices: Arc<dyn NoticeSink>,
        loading: Arc<dyn LoadingSink>,
    ) -> Self {
        Self {
            pending: AtomicUsize::new(0),
            redirect_gate: AtomicBool::new(false),
            tokens,
            notices,
            loading,
            guard: OnceLock::new(),
        }
    }

    /// Install the session guard once both sides of the client/session
    /// cycle exist. Later calls are ignored.
    pub fn install_guard(&self, guard: Arc<dyn SessionGuard>) {
        let _ = self.guard.set(guard);
    }

    /// Number of counted requests currently in flight.
    pub fn pending_requests(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub(crate) fn access_token(&self) -> Option<AccessToken> {
        self.tokens.access_token()
    }

    pub(crate) fn surface(&self, notice: Notice) {
        self.notices.surface(notice);
    }

    pub(crate) fn guard(&self) -> Option<&Arc<dyn SessionGuard>> {
        self.guard.get()
    }

    /// Count a request as in flight; the loading sink fires on the 0 to 1
    /// transition.
    pub(crate) fn begin_request(&self) {
        if self.pending.fetch_add(1, Ordering::SeqCst) == 0 {
            self.loading.loading_started();
        }
    }

    /// Count a request as settled; the loading sink fires on the 1 to 0
    /// transition. The counter never drops below zero.
    pub(crate) fn finish_request(&self) {
        let prev = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if prev == Ok(1) {
            self.loading.loading_finished();
        }
    }

    /// Claim the 401 redirect; only the first concurrent failure wins.
    pub(crate) fn try_acquire_redirect(&self) -> bool {
        self.redirect_gate
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release_redirect(&self) {
        self.redirect_gate.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("pending", &self.pending_requests())
            .field("redirect_gate", &self.redirect_gate.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTokens;

    impl TokenProvider for NoTokens {
        fn access_token(&self) -> Option<AccessToken> {
            None
        }
    }

    struct CountingLoading {
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl LoadingSink for CountingLoading {
        fn loading_started(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn loading_finished(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_context() -> (ClientContext, Arc<CountingLoading>) {
        let loading = Arc::new(CountingLoading {
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        });
        let ctx = ClientContext::with_sinks(Arc::new(NoTokens), Arc::new(NullSink), loading.clone());
        (ctx, loading)
    }

    #[test]
    fn loading_sink_fires_only_on_edges() {
        let (ctx, loading) = counting_context();

        ctx.begin_request();
        ctx.begin_request();
        assert_eq!(loading.started.load(Ordering::SeqCst), 1);

        ctx.finish_request();
        assert_eq!(loading.finished.load(Ordering::SeqCst), 0);
        ctx.finish_request();
        assert_eq!(loading.finished.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.pending_requests(), 0);
    }

    #[test]
    fn counter_never_goes_negative() {
        let (ctx, loading) = counting_context();
        ctx.finish_request();
        assert_eq!(ctx.pending_requests(), 0);
        assert_eq!(loading.finished.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn redirect_gate_is_single_flight() {
        let (ctx, _) = counting_context();
        assert!(ctx.try_acquire_redirect());
        assert!(!ctx.try_acquire_redirect());
        ctx.release_redirect();
        assert!(ctx.try_acquire_redirect());
    }
}
