//! `Logger` adapter backed by `tracing`.

use crate::error::ExecError;
use crate::ports::Logger;

/// Forwards logger calls to `tracing` events.
///
/// Every event carries a `component` field so that several triggers (or
/// hosts) sharing one subscriber can be told apart.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl TracingLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("tripwire")
    }
}

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(component = %self.component, "{}", msg);
    }

    fn warning(&self, msg: &str) {
        tracing::warn!(component = %self.component, "{}", msg);
    }

    fn debug(&self, msg: &str) {
        tracing::debug!(component = %self.component, "{}", msg);
    }

    fn trace(&self, msg: &str) {
        tracing::trace!(component = %self.component, "{}", msg);
    }

    fn error(&self, msg: &str, error: &ExecError) {
        tracing::error!(component = %self.component, error = %error, "{}", msg);
    }
}
