//! Probe timing
//!
//! Wraps one probe invocation with wall-clock timing and returns the
//! measurement directly to the caller. Each invocation uses its own locals,
//! so concurrent probes within a round never clobber each other's marks.
//! Because the probe boundary swallows failures, every invocation yields
//! exactly one measurement.

use crate::config::ProbeKind;
use crate::logging::Logger;
use crate::probe::Probe;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

/// One recorded (timestamp, probe kind, duration) triple. Consumed by the
/// result sink immediately; nothing is retained in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub kind: ProbeKind,
    pub duration_ms: f64,
}

/// Time one probe call, success or failure. The row timestamp is taken after
/// the call completes: it marks when the result was recorded, not when the
/// probe fired.
pub async fn measure(probe: &dyn Probe, log: &Logger) -> Measurement {
    let started = Instant::now();
    probe.run_logged(log).await;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let timestamp = Utc::now();

    log.debug(&format!("duration {} ms", duration_ms));

    Measurement {
        timestamp,
        kind: probe.kind(),
        duration_ms,
    }
}
