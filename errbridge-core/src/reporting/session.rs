//! Lazy, idempotent initialization of the reporting client.

use std::sync::Arc;

use errbridge_config::ServerReportingConfig;
use parking_lot::Mutex;
use tracing::debug;

use super::{Level, ReportableError, ReportingClient};
use crate::error::ReportError;

/// Wraps a [`ReportingClient`] and remembers which configuration it was last
/// initialized with.
///
/// `init` runs on the first report and again only when the derived config
/// differs from the active one, so calling [`ReportingSession::submit`] on
/// every event is cheap and always reflects the current settings.
pub struct ReportingSession {
    client: Arc<dyn ReportingClient>,
    active: Mutex<Option<ServerReportingConfig>>,
}

impl ReportingSession {
    pub fn new(client: Arc<dyn ReportingClient>) -> Self {
        Self {
            client,
            active: Mutex::new(None),
        }
    }

    pub fn ensure_initialized(&self, config: &ServerReportingConfig) -> Result<(), ReportError> {
        self.init_locked(&mut self.active.lock(), config)
    }

    /// Initializes if needed, then hands one report to the client.
    ///
    /// The session lock is held until the client returns, so a concurrent
    /// re-init for a rotated config cannot slip in between the two calls.
    pub fn submit(
        &self,
        config: &ServerReportingConfig,
        level: Level,
        error: &ReportableError,
    ) -> Result<(), ReportError> {
        let mut active = self.active.lock();
        self.init_locked(&mut active, config)?;
        self.client.report(level, error)
    }

    pub fn is_initialized(&self) -> bool {
        self.active.lock().is_some()
    }

    fn init_locked(
        &self,
        active: &mut Option<ServerReportingConfig>,
        config: &ServerReportingConfig,
    ) -> Result<(), ReportError> {
        if active.as_ref() == Some(config) {
            return Ok(());
        }

        debug!(environment = %config.environment, "initializing reporting client");
        self.client.init(config)?;
        *active = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::MemoryReportingClient;

    fn config(token: &str) -> ServerReportingConfig {
        ServerReportingConfig {
            access_token: token.into(),
            environment: "production".into(),
        }
    }

    #[test]
    fn initializes_once_per_config() {
        let client = Arc::new(MemoryReportingClient::new());
        let session = ReportingSession::new(client.clone());
        assert!(!session.is_initialized());

        let error = ReportableError::from_message("boom");
        session.submit(&config("tok123"), Level::Error, &error).unwrap();
        session.submit(&config("tok123"), Level::Error, &error).unwrap();
        assert_eq!(client.inits(), vec![config("tok123")]);
        assert_eq!(client.report_count(), 2);

        session.submit(&config("rotated"), Level::Error, &error).unwrap();
        assert_eq!(client.inits(), vec![config("tok123"), config("rotated")]);
    }

    #[test]
    fn failed_init_is_retried_on_next_event() {
        let client = Arc::new(MemoryReportingClient::new());
        client.fail_init(true);
        let session = ReportingSession::new(client.clone());

        let error = ReportableError::from_message("boom");
        assert!(session.submit(&config("tok123"), Level::Error, &error).is_err());
        assert!(!session.is_initialized());

        client.fail_init(false);
        session.submit(&config("tok123"), Level::Error, &error).unwrap();
        assert!(session.is_initialized());
        assert_eq!(client.report_count(), 1);
    }

    #[test]
    fn concurrent_submits_report_under_their_own_config() {
        let client = Arc::new(MemoryReportingClient::new());
        let session = ReportingSession::new(client.clone());

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let session = &session;
                scope.spawn(move || {
                    let token = if worker % 2 == 0 { "tokeven" } else { "tokodd" };
                    for _ in 0..50 {
                        let error = ReportableError::from_message(token);
                        session.submit(&config(token), Level::Error, &error).unwrap();
                    }
                });
            }
        });

        let reports = client.reports();
        assert_eq!(reports.len(), 200);
        for report in reports {
            assert_eq!(report.config.access_token, report.error.message());
        }
    }
}
