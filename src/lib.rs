//! ConnectWise Latency Probe
//!
//! An interactive latency-benchmarking tool that repeatedly times either an
//! MSSQL count query or a ConnectWise REST ticket-count call at a configurable
//! interval and parallelism, appending every per-call duration to a CSV file.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod session;
pub mod shutdown;
pub mod sink;
pub mod timing;

// Re-export commonly used types
pub use config::{ProbeKind, RunConfig, SchedulePolicy};
pub use error::{AppError, Result};
pub use logging::{LogLevel, Logger};
pub use timing::Measurement;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
    pub const DEFAULT_PARALLELISM: u32 = 1;

    /// The fixed table the SQL probe counts against.
    pub const SQL_COUNT_TARGET: &str = "sr_service";

    /// CSV header written once per output file.
    pub const CSV_HEADER: &str = "date,test_type,duration";
}
