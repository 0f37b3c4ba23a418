//! Probe implementations
//!
//! A probe is a single timed call against an external dependency. Errors are
//! caught and logged at the probe boundary and never propagate further, so
//! the timing wrapper always records a duration for every invocation.

pub mod api;
pub mod sql;

pub use api::{ApiProbe, CwApiClient};
pub use sql::SqlProbe;

use crate::config::ProbeKind;
use crate::error::Result;
use crate::logging::Logger;
use async_trait::async_trait;

/// A single timed call against the database or the remote API.
///
/// `execute` returns the observed count purely for diagnostics; the value is
/// logged, never recorded.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Which kind of dependency this probe hits
    fn kind(&self) -> ProbeKind;

    /// Issue one call and return the observed count
    async fn execute(&self) -> Result<i64>;

    /// Run one probe call, catching and logging failure.
    ///
    /// This is the error boundary: a failed call is logged with its category
    /// and message and otherwise ignored, so the caller still times it.
    async fn run_logged(&self, log: &Logger) {
        match self.execute().await {
            Ok(count) => {
                log.debug(&format!("{} count: {}", self.kind(), count));
            }
            Err(e) => {
                log.warn(&format!(
                    "{} probe failed [{}]: {}",
                    self.kind(),
                    e.category(),
                    e
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::logging::LogLevel;

    struct AlwaysFails;

    #[async_trait]
    impl Probe for AlwaysFails {
        fn kind(&self) -> ProbeKind {
            ProbeKind::CwApi
        }

        async fn execute(&self) -> Result<i64> {
            Err(AppError::api("simulated outage"))
        }
    }

    #[tokio::test]
    async fn test_run_logged_swallows_errors() {
        let log = Logger::new("TEST").with_min_level(LogLevel::Error);
        // Must not panic or propagate
        AlwaysFails.run_logged(&log).await;
    }
}
