//! Error handling for the latency probe

use thiserror::Error;

/// Custom error types for the latency probe
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (.env handling, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection establishment / pool checkout errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// SQL query execution errors
    #[error("Query error: {0}")]
    Query(String),

    /// ConnectWise REST API errors
    #[error("API error: {0}")]
    Api(String),

    /// I/O errors (CSV output, prompt reading)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (prompt input, JSON bodies)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query(message.into())
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Connection(_) => "CONN",
            Self::Query(_) => "QUERY",
            Self::Api(_) => "API",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if the error is a per-probe failure.
    ///
    /// Per-probe failures are caught at the probe boundary and still produce
    /// a measurement; anything else aborts session setup.
    pub fn is_probe_failure(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Query(_) | Self::Api(_))
    }

    /// Get exit code for this error type.
    ///
    /// Only session-setup failures ever surface here; a running session always
    /// terminates via signal with status 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Connection(_) | Self::Query(_) | Self::Api(_) => 2,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Connection(_) | Self::Query(_) | Self::Api(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::connection(error.to_string())
        } else {
            Self::api(error.to_string())
        }
    }
}

impl From<tiberius::error::Error> for AppError {
    fn from(error: tiberius::error::Error) -> Self {
        Self::query(error.to_string())
    }
}

// RunError only displays when the inner error type does.
impl<E: std::error::Error + 'static> From<bb8::RunError<E>> for AppError {
    fn from(error: bb8::RunError<E>) -> Self {
        Self::connection(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Missing DB_SERVER");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_probe_failure());
        assert_eq!(config_error.exit_code(), 1);

        let conn_error = AppError::connection("login failed");
        assert_eq!(conn_error.category(), "CONN");
        assert!(conn_error.is_probe_failure());
        assert_eq!(conn_error.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::query("invalid object name 'sr_service'");
        let display = error.to_string();
        assert!(display.contains("Query error"));
        assert!(display.contains("sr_service"));
    }

    #[test]
    fn test_probe_failure_classification() {
        assert!(AppError::connection("x").is_probe_failure());
        assert!(AppError::query("x").is_probe_failure());
        assert!(AppError::api("x").is_probe_failure());

        assert!(!AppError::config("x").is_probe_failure());
        assert!(!AppError::io("x").is_probe_failure());
        assert!(!AppError::parse("x").is_probe_failure());
        assert!(!AppError::internal("x").is_probe_failure());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::parse("x").exit_code(), 1);
        assert_eq!(AppError::api("x").exit_code(), 2);
        assert_eq!(AppError::io("x").exit_code(), 5);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<i32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let app_error: AppError = json_error.into();
        assert_eq!(app_error.category(), "PARSE");
    }

    #[test]
    fn test_pool_error_conversion() {
        let timed_out = bb8::RunError::<std::io::Error>::TimedOut;
        let app_error: AppError = timed_out.into();
        assert_eq!(app_error.category(), "CONN");
        assert!(app_error.is_probe_failure());

        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let app_error: AppError = bb8::RunError::User(inner).into();
        assert_eq!(app_error.category(), "CONN");
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("backing store gone");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::api("503 Service Unavailable");
        let plain = error.format_for_console(false);
        let colored = error.format_for_console(true);

        assert!(plain.contains("[API]"));
        assert!(plain.contains("503"));
        assert!(colored.contains("503"));
    }
}
