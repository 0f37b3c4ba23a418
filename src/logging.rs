//! Console logging for the latency probe
//!
//! A trimmed-down structured logger: leveled, per-component names, colored
//! level tags, warnings and errors routed to stderr. The probe is a terminal
//! tool, so there is no file or JSON output.

use chrono::Utc;
use std::io::{self, Write};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn colorize(&self, text: &str) -> String {
        use colored::Colorize;
        match self {
            LogLevel::Debug => text.cyan().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Error => text.red().to_string(),
        }
    }
}

/// Leveled console logger, cheap to clone and share across tasks.
#[derive(Debug, Clone)]
pub struct Logger {
    name: &'static str,
    min_level: LogLevel,
    use_color: bool,
}

impl Logger {
    /// Create a new logger for a named component
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            min_level: LogLevel::Info,
            use_color: true,
        }
    }

    /// Set the minimum level that will be emitted
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Create a logger for another component with the same settings
    pub fn for_component(&self, name: &'static str) -> Self {
        Self {
            name,
            min_level: self.min_level,
            use_color: self.use_color,
        }
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Write one formatted log line
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.would_log(level) {
            return;
        }

        let line = self.format_line(level, message);

        // Warnings and errors go to stderr so stdout stays usable for prompts.
        if level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", line);
        } else {
            let _ = writeln!(io::stdout(), "{}", line);
        }
    }

    fn format_line(&self, level: LogLevel, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let tag = format!("{:>5}", level.as_str());
        let tag = if self.use_color {
            level.colorize(&tag)
        } else {
            tag
        };
        format!("{} {} [{}] {}", timestamp, tag, self.name, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_strings() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_would_log() {
        let logger = Logger::new("TEST").with_min_level(LogLevel::Warn);
        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
    }

    #[test]
    fn test_format_line_plain() {
        let logger = Logger::new("SESSION").with_color(false);
        let line = logger.format_line(LogLevel::Info, "Starting tests");
        assert!(line.contains(" INFO"));
        assert!(line.contains("[SESSION]"));
        assert!(line.contains("Starting tests"));
    }

    #[test]
    fn test_for_component_inherits_settings() {
        let base = Logger::new("SESSION")
            .with_min_level(LogLevel::Debug)
            .with_color(false);
        let derived = base.for_component("SINK");
        assert!(derived.would_log(LogLevel::Debug));
        let line = derived.format_line(LogLevel::Debug, "row appended");
        assert!(line.contains("[SINK]"));
    }
}
