//! # errbridge telemetry
//!
//! Logging and metrics for the bridge's own activity.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
