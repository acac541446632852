//! Client metrics

use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};
use std::time::{Duration, Instant};
use tracing::warn;

lazy_static::lazy_static! {
    pub static ref OHMYFIN_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "ohmyfin_requests_total",
        "Total Ohmyfin API requests",
        &["operation", "outcome"]
    )
    .unwrap();

    pub static ref OHMYFIN_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "ohmyfin_request_duration_seconds",
        "Ohmyfin API request duration",
        &["operation"]
    )
    .unwrap();
}

/// Outcome label for a finished call
pub(crate) fn outcome_label<T>(result: &crate::Result<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(crate::Error::Config(_)) => "config_error",
        Err(crate::Error::Validation(_)) => "validation_error",
        Err(crate::Error::Transport(_)) => "transport_error",
        Err(crate::Error::Decode(_)) => "decode_error",
        Err(crate::Error::Api { .. }) => "api_error",
    }
}

/// Records duration and outcome of one call, including calls dropped mid-flight
pub(crate) struct CallGuard {
    operation: &'static str,
    start: Instant,
    finished: bool,
}

impl CallGuard {
    /// Start timing an operation
    pub(crate) fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
            finished: false,
        }
    }

    /// Record the finished call and return its duration
    pub(crate) fn finish<T>(&mut self, result: &crate::Result<T>) -> Duration {
        self.finished = true;
        self.record(outcome_label(result))
    }

    fn record(&self, outcome: &str) -> Duration {
        let duration = self.start.elapsed();
        OHMYFIN_REQUEST_DURATION
            .with_label_values(&[self.operation])
            .observe(duration.as_secs_f64());
        OHMYFIN_REQUESTS_TOTAL
            .with_label_values(&[self.operation, outcome])
            .inc();
        duration
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        if !self.finished {
            let duration = self.record("transport_error");
            warn!(
                "Ohmyfin {} dropped before completion after {:?}",
                self.operation, duration
            );
        }
    }
}
