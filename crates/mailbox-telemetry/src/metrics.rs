//! Prometheus metrics for mailbox endpoints.
//!
//! All metrics follow the naming convention: `mailbox_ipc_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., messages_sent_total)
//! - **Gauge**: Value that can go up or down (e.g., active_subscriptions)
//! - **Histogram**: Distribution of values (e.g., receive_wait_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SEND PATH
    // =========================================================================

    /// Messages written to a mailbox, by type tag
    pub static ref MESSAGES_SENT: CounterVec = CounterVec::new(
        Opts::new("mailbox_ipc_messages_sent_total", "Messages written to a mailbox"),
        &["type_tag"]
    ).expect("metric creation failed");

    /// Rejected sends, by error kind
    pub static ref SEND_ERRORS: CounterVec = CounterVec::new(
        Opts::new("mailbox_ipc_send_errors_total", "Sends rejected before any write"),
        &["kind"]  // kind: unsupported_type/delimiter_in_value
    ).expect("metric creation failed");

    // =========================================================================
    // RECEIVE PATH
    // =========================================================================

    /// Messages delivered to receivers
    pub static ref MESSAGES_RECEIVED: Counter = Counter::new(
        "mailbox_ipc_messages_received_total",
        "Messages that passed a receive filter"
    ).expect("metric creation failed");

    /// Change events skipped by a receive filter, by reason
    pub static ref FILTER_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("mailbox_ipc_filter_rejections_total", "Change events skipped by a receive filter"),
        &["reason"]  // reason: key/sender/self/value
    ).expect("metric creation failed");

    /// Live mailbox subscriptions held by receive operations
    pub static ref ACTIVE_SUBSCRIPTIONS: Gauge = Gauge::new(
        "mailbox_ipc_active_subscriptions",
        "Mailbox subscriptions held by pending receive operations"
    ).expect("metric creation failed");

    /// Time a receive operation waited for its match
    pub static ref RECEIVE_WAIT: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "mailbox_ipc_receive_wait_seconds",
            "Time between subscribing and resolving a receive"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle to the registry the metrics were registered with.
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Encode the registry as Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Send path
        Box::new(MESSAGES_SENT.clone()),
        Box::new(SEND_ERRORS.clone()),
        // Receive path
        Box::new(MESSAGES_RECEIVED.clone()),
        Box::new(FILTER_REJECTIONS.clone()),
        Box::new(ACTIVE_SUBSCRIPTIONS.clone()),
        Box::new(RECEIVE_WAIT.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
