//! Progress reporting for generation runs

use tracing::{info, warn};

/// Receives user-facing progress messages
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);

    /// Something was skipped or could not be generated
    fn warning(&self, message: &str);

    /// The run finished
    fn success(&self, message: &str);
}

/// Forwards reports to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn success(&self, message: &str) {
        info!(status = "done", "{}", message);
    }
}
