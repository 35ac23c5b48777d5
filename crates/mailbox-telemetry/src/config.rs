//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error), or any
    /// `EnvFilter` directive string
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to register the Prometheus metrics
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "mailbox-ipc".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAILBOX_SERVICE_NAME`: Service name (default: mailbox-ipc)
    /// - `MAILBOX_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `MAILBOX_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `MAILBOX_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `MAILBOX_METRICS`: Register Prometheus metrics (default: true)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("MAILBOX_SERVICE_NAME")
                .unwrap_or_else(|_| "mailbox-ipc".to_string()),

            log_level: env::var("MAILBOX_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("MAILBOX_CONSOLE_OUTPUT")
                .map(|v| is_truthy(&v))
                .unwrap_or(true),

            json_logs: env::var("MAILBOX_JSON_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),

            metrics_enabled: env::var("MAILBOX_METRICS")
                .map(|v| is_truthy(&v))
                .unwrap_or(true),
        }
    }

    /// Builder-style method to set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Builder-style method to switch JSON output.
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Parse a boolean environment value.
///
/// Only `1`, `true`, `yes` and `on` (any case, surrounding whitespace
/// ignored) are true. Shared by every `MAILBOX_*` flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
