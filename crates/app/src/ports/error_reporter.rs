//! Error reporting port — the sink for failures that must not escape a store.

use barrelhub_domain::error::BarrelHubError;

/// Receives non-fatal errors from stores and background work.
pub trait ErrorReporter: Send + Sync {
    /// Record `error`. `context` names the component that hit it (a feed
    /// topic, a service path, …).
    fn report(&self, context: &str, error: &BarrelHubError);
}

impl<T: ErrorReporter + ?Sized> ErrorReporter for std::sync::Arc<T> {
    fn report(&self, context: &str, error: &BarrelHubError) {
        (**self).report(context, error);
    }
}

/// Default reporter: one `warn` line per error through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &BarrelHubError) {
        tracing::warn!(context, error = %error, "operation failed");
    }
}
