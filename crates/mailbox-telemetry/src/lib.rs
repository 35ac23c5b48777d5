//! # Mailbox Telemetry
//!
//! Logging and metrics for mailbox endpoints.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   pretty or JSON formatter
//! - **Metrics**: Prometheus counters for the send and receive paths
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailbox_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MAILBOX_SERVICE_NAME` | `mailbox-ipc` | Service name in logs |
//! | `MAILBOX_LOG_LEVEL` | `info` | Log level filter |
//! | `MAILBOX_JSON_LOGS` | `false` | JSON formatted output |
//! | `MAILBOX_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `MAILBOX_METRICS` | `true` | Register Prometheus metrics |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::{is_truthy, TelemetryConfig};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, ACTIVE_SUBSCRIPTIONS, FILTER_REJECTIONS,
    MESSAGES_RECEIVED, MESSAGES_SENT, RECEIVE_WAIT, SEND_ERRORS,
};
pub use tracing_setup::{env_filter, init_test_tracing, init_tracing, TracingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and, when enabled, metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = if config.metrics_enabled {
        Some(register_metrics()?)
    } else {
        None
    };

    let tracing = init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing,
        metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
    metrics: Option<MetricsHandle>,
}

impl TelemetryGuard {
    /// The metrics handle, if metrics were enabled.
    #[must_use]
    pub fn metrics(&self) -> Option<&MetricsHandle> {
        self.metrics.as_ref()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with endpoint context.
///
/// # Example
///
/// ```rust,ignore
/// let _span = endpoint_span!("recv_once", sender = "alice").entered();
/// ```
#[macro_export]
macro_rules! endpoint_span {
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
