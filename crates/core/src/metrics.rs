//! Metrics definitions for the tool dispatcher.
//!
//! This module defines all metrics used throughout the service.
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

use crate::error::RejectionKind;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "tool_calls_total",
        "Total number of tool calls, by tool and outcome"
    );
    describe_counter!(
        "tool_rejections_total",
        "Total number of rejected tool calls, by tool and rejection kind"
    );
    describe_counter!(
        "capability_checks_total",
        "Total number of capability oracle checks, by outcome"
    );
    describe_histogram!(
        "tool_call_duration_seconds",
        "Time taken to handle a tool call in seconds"
    );
}

/// Outcome label of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// A transaction was prepared.
    Prepared,
    /// Informational reply (listing, confirmation prompt, cancellation).
    Message,
    Rejected,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepared => "prepared",
            Self::Message => "message",
            Self::Rejected => "rejected",
        }
    }
}

/// Record a completed tool call.
pub fn record_tool_call(tool: &str, outcome: CallOutcome) {
    counter!("tool_calls_total", "tool" => tool.to_string(), "outcome" => outcome.as_str())
        .increment(1);
}

/// Record a rejection.
///
/// # Arguments
/// * `tool` - The tool name (or the requested name for unknown tools)
/// * `kind` - The rejection category
pub fn record_rejection(tool: &str, kind: RejectionKind) {
    counter!("tool_rejections_total", "tool" => tool.to_string(), "kind" => kind.as_str())
        .increment(1);
}

/// Record a capability oracle check.
///
/// # Arguments
/// * `outcome` - "supported", "unsupported" or "unavailable"
pub fn record_capability_check(outcome: &'static str) {
    counter!("capability_checks_total", "outcome" => outcome).increment(1);
}

/// Record tool call duration.
pub fn record_tool_call_duration(duration_secs: f64) {
    histogram!("tool_call_duration_seconds").record(duration_secs);
}

/// A timer that automatically records duration when dropped.
pub struct CallTimer {
    start: Instant,
}

impl CallTimer {
    /// Start a new call timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for CallTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CallTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_tool_call_duration(duration);
    }
}
