//! Run configuration: probe kind, interval, parallelism, scheduling policy

pub mod env;

use crate::defaults;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which external dependency a session probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeKind {
    /// MSSQL count query against the service table
    Mssql,
    /// ConnectWise REST ticket-count call
    CwApi,
}

impl ProbeKind {
    /// Label used in the output filename and CSV rows
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Mssql => "MSSQL",
            ProbeKind::CwApi => "CWAPI",
        }
    }

    /// Parse a prompt answer. "1" selects MSSQL, "2" selects the API;
    /// anything else falls back to MSSQL.
    pub fn from_prompt(answer: &str) -> Self {
        match answer.trim() {
            "2" => ProbeKind::CwApi,
            _ => ProbeKind::Mssql,
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the tick loop does when the previous round is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePolicy {
    /// Fire a new round on every tick regardless of in-flight rounds.
    /// Slow dependencies accumulate unbounded in-flight probes.
    #[default]
    AllowOverlap,
    /// Drop the tick when a round is still running.
    SkipIfBusy,
    /// Await the round before the next tick can fire.
    QueueAndSerialize,
}

/// Immutable per-session settings collected from the interactive prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub kind: ProbeKind,
    pub interval: Duration,
    pub parallelism: u32,
    pub policy: SchedulePolicy,
}

impl RunConfig {
    /// Build a config from the three raw prompt answers, applying defaults
    /// for unrecognized or non-numeric input.
    pub fn from_prompt_answers(kind: &str, interval_secs: &str, parallelism: &str) -> Self {
        Self {
            kind: ProbeKind::from_prompt(kind),
            interval: parse_interval(interval_secs),
            parallelism: parse_parallelism(parallelism),
            policy: SchedulePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Interval expressed in whole seconds, as used in the output filename.
    pub fn interval_secs(&self) -> u64 {
        self.interval.as_secs()
    }

    /// Deterministic per-session output filename:
    /// `results-<start>-<KIND>-int_<secs>-p<parallelism>.csv`
    pub fn output_file_name(&self, start: DateTime<Local>) -> String {
        format!(
            "results-{}-{}-int_{}-p{}.csv",
            start.format("%Y-%m-%d %H_%M_%S"),
            self.kind,
            self.interval_secs(),
            self.parallelism,
        )
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Mssql,
            interval: defaults::DEFAULT_INTERVAL,
            parallelism: defaults::DEFAULT_PARALLELISM,
            policy: SchedulePolicy::default(),
        }
    }
}

/// Parse the interval prompt answer (seconds). Non-numeric input falls back
/// to the 15 second default.
pub fn parse_interval(answer: &str) -> Duration {
    match answer.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => defaults::DEFAULT_INTERVAL,
    }
}

/// Parse the parallelism prompt answer. Non-numeric input falls back to 1.
pub fn parse_parallelism(answer: &str) -> u32 {
    match answer.trim().parse::<u32>() {
        Ok(n) => n,
        Err(_) => defaults::DEFAULT_PARALLELISM,
    }
}
