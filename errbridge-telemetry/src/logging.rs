//! ## errbridge-telemetry::logging
//! **Structured logging with `tracing` and OpenTelemetry key/values**
//!
//! Every forwarded report and every injected snippet is recorded as a
//! `bridge_event` with its metadata, so the bridge's own activity shows up in
//! the host's logs next to the errors it forwards.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber (`RUST_LOG`, default `info`).
    ///
    /// Does nothing when the host already installed a subscriber.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }

    #[inline]
    pub fn record(event_type: &str, metadata: &[KeyValue]) {
        let span = info_span!("bridge_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();

        let fields: Vec<String> = metadata
            .iter()
            .map(|kv| format!("{}={}", kv.key.as_str(), kv.value.as_str()))
            .collect();
        tracing::info!(metadata = ?fields, "Bridge event recorded");
    }
}
