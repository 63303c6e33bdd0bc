//! ## errbridge-telemetry::metrics
//! **Prometheus counters for the reporting bridge**
//!
//! One registry per bridge instance; the host decides whether and where to
//! expose [`MetricsRecorder::gather_metrics`].

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub reports_submitted: IntCounterVec,
    pub reports_failed: IntCounter,
    pub reports_skipped: IntCounter,
    pub scripts_injected: IntCounter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reports_submitted = IntCounterVec::new(
            Opts::new(
                "errbridge_reports_submitted_total",
                "Error reports handed to the reporting client",
            ),
            &["source"],
        )?;
        let reports_failed = IntCounter::new(
            "errbridge_reports_failed_total",
            "Error reports the reporting client failed to accept",
        )?;
        let reports_skipped = IntCounter::new(
            "errbridge_reports_skipped_total",
            "Error events dropped because server reporting is disabled",
        )?;
        let scripts_injected = IntCounter::new(
            "errbridge_scripts_injected_total",
            "Client snippets registered into rendered pages",
        )?;

        registry.register(Box::new(reports_submitted.clone()))?;
        registry.register(Box::new(reports_failed.clone()))?;
        registry.register(Box::new(reports_skipped.clone()))?;
        registry.register(Box::new(scripts_injected.clone()))?;

        Ok(Self {
            registry,
            reports_submitted,
            reports_failed,
            reports_skipped,
            scripts_injected,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_submitted(&self, source: &str) {
        self.reports_submitted.with_label_values(&[source]).inc();
    }

    pub fn inc_failed(&self) {
        self.reports_failed.inc();
    }

    pub fn inc_skipped(&self) {
        self.reports_skipped.inc();
    }

    pub fn inc_injected(&self) {
        self.scripts_injected.inc();
    }

    pub fn submitted(&self, source: &str) -> u64 {
        self.reports_submitted.with_label_values(&[source]).get()
    }
}
