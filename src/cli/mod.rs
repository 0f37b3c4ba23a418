//! Interactive prompt flow
//!
//! The probe has no flag-based invocation: all three settings come from
//! sequential stdin prompts. The prompter is generic over its input and
//! output streams so tests can drive it with in-memory buffers.

use crate::config::RunConfig;
use crate::error::{AppError, Result};
use std::io::{BufRead, Write};

/// Prompt text shown for the probe-kind menu.
const KIND_PROMPT: &str = "Select test type:\r\n[1] - MSSQL\r\n2 - CWAPI\r\n>";
const INTERVAL_PROMPT: &str = "Time between queries [15]s:\r\n>";
const PARALLELISM_PROMPT: &str = "Parallelism [1]:\r\n>";

/// Sequential prompt runner over arbitrary streams.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the three prompts in order and build the session config.
    /// Unrecognized or non-numeric answers fall back to defaults.
    pub fn collect_run_config(&mut self) -> Result<RunConfig> {
        let kind = self.ask(KIND_PROMPT)?;
        let interval = self.ask(INTERVAL_PROMPT)?;
        let parallelism = self.ask(PARALLELISM_PROMPT)?;
        Ok(RunConfig::from_prompt_answers(&kind, &interval, &parallelism))
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::io(format!("Failed to write prompt: {}", e)))?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(|e| AppError::io(format!("Failed to read prompt answer: {}", e)))?;
        Ok(answer.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
    }
}

/// Collect the session config from the process stdin/stdout.
pub fn prompt_run_config() -> Result<RunConfig> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    prompter.collect_run_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProbeKind, SchedulePolicy};
    use std::io::Cursor;
    use std::time::Duration;

    fn run_prompts(input: &str) -> (RunConfig, String) {
        let mut output = Vec::new();
        let config = Prompter::new(Cursor::new(input.to_string()), &mut output)
            .collect_run_config()
            .unwrap();
        (config, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_sql_session_answers() {
        let (config, transcript) = run_prompts("1\n5\n2\n");
        assert_eq!(config.kind, ProbeKind::Mssql);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.parallelism, 2);
        assert!(transcript.contains("[1] - MSSQL"));
        assert!(transcript.contains("Parallelism [1]"));
    }

    #[test]
    fn test_api_session_with_defaults() {
        let (config, _) = run_prompts("2\n\n\n");
        assert_eq!(config.kind, ProbeKind::CwApi);
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.parallelism, 1);
    }

    #[test]
    fn test_unrecognized_answers_fall_back() {
        let (config, _) = run_prompts("yes please\nsoon\nlots\n");
        assert_eq!(config.kind, ProbeKind::Mssql);
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.parallelism, 1);
        assert_eq!(config.policy, SchedulePolicy::AllowOverlap);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (config, _) = run_prompts("2\r\n30\r\n4\r\n");
        assert_eq!(config.kind, ProbeKind::CwApi);
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn test_exhausted_input_uses_defaults() {
        // EOF on a prompt reads as an empty answer, which parses to defaults.
        let (config, _) = run_prompts("2\n");
        assert_eq!(config.kind, ProbeKind::CwApi);
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.parallelism, 1);
    }
}
