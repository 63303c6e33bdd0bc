//! Forwards host exceptions and job failures to the reporting client.

use std::sync::Arc;

use errbridge_config::SettingsStore;
use errbridge_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use tracing::{debug, warn};

use crate::events::{ExceptionEvent, JobErrorEvent};
use crate::reporting::{Level, ReportSource, ReportableError, ReportingClient, ReportingSession};

/// What happened to one error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// One report was handed to the client.
    Submitted,
    /// Server reporting is not configured; nothing was sent.
    Disabled,
    /// The client refused the init or the report. Logged, not propagated.
    Failed,
}

pub struct ServerErrorSubscriber {
    settings: Arc<SettingsStore>,
    session: ReportingSession,
    metrics: MetricsRecorder,
}

impl ServerErrorSubscriber {
    pub fn new(
        settings: Arc<SettingsStore>,
        client: Arc<dyn ReportingClient>,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            settings,
            session: ReportingSession::new(client),
            metrics,
        }
    }

    pub fn on_exception(&self, event: &ExceptionEvent) -> ForwardOutcome {
        self.forward(ReportSource::Exception, &event.error)
    }

    /// Job failures are gated on the same server token check as exceptions.
    pub fn on_job_error(&self, event: &JobErrorEvent) -> ForwardOutcome {
        debug!(job = %event.job, attempt = event.attempt, "job failed");
        self.forward(ReportSource::Job, &event.error)
    }

    pub fn session(&self) -> &ReportingSession {
        &self.session
    }

    fn forward(&self, source: ReportSource, error: &ReportableError) -> ForwardOutcome {
        let Some(config) = self.settings.server_config() else {
            debug!(source = source.as_str(), "server reporting disabled, dropping error");
            self.metrics.inc_skipped();
            return ForwardOutcome::Disabled;
        };

        match self.session.submit(&config, Level::Error, error) {
            Ok(()) => {
                self.metrics.inc_submitted(source.as_str());
                EventLogger::record(
                    "report_submitted",
                    &[
                        KeyValue::new("source", source.as_str()),
                        KeyValue::new("level", Level::Error.as_str()),
                        KeyValue::new("environment", config.environment),
                    ],
                );
                ForwardOutcome::Submitted
            }
            Err(e) => {
                warn!(
                    source = source.as_str(),
                    error = %e,
                    "reporting client did not accept error report"
                );
                self.metrics.inc_failed();
                ForwardOutcome::Failed
            }
        }
    }
}
