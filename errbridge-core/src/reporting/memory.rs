//! In-memory reporting client.
//!
//! Records every `init` and `report` call instead of sending anything. Used by
//! the test suites and by `errbridge simulate`; failures can be switched on to
//! exercise the bridge's transport-failure path.

use std::sync::atomic::{AtomicBool, Ordering};

use errbridge_config::ServerReportingConfig;
use parking_lot::Mutex;

use super::{Level, ReportableError, ReportingClient};
use crate::error::ReportError;

/// A report as the client received it.
#[derive(Debug, Clone)]
pub struct RecordedReport {
    pub level: Level,
    pub error: ReportableError,
    pub config: ServerReportingConfig,
}

#[derive(Debug, Default)]
pub struct MemoryReportingClient {
    current: Mutex<Option<ServerReportingConfig>>,
    inits: Mutex<Vec<ServerReportingConfig>>,
    reports: Mutex<Vec<RecordedReport>>,
    fail_init: AtomicBool,
    fail_transport: AtomicBool,
}

impl MemoryReportingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `init` calls fail.
    pub fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `report` calls fail as if the service were unreachable.
    pub fn fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    pub fn inits(&self) -> Vec<ServerReportingConfig> {
        self.inits.lock().clone()
    }

    pub fn reports(&self) -> Vec<RecordedReport> {
        self.reports.lock().clone()
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().len()
    }
}

impl ReportingClient for MemoryReportingClient {
    fn init(&self, config: &ServerReportingConfig) -> Result<(), ReportError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(ReportError::Rejected("invalid access token".into()));
        }
        self.inits.lock().push(config.clone());
        *self.current.lock() = Some(config.clone());
        Ok(())
    }

    fn report(&self, level: Level, error: &ReportableError) -> Result<(), ReportError> {
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(ReportError::Transport("service unreachable".into()));
        }
        let config = self
            .current
            .lock()
            .clone()
            .ok_or(ReportError::NotInitialized)?;
        self.reports.lock().push(RecordedReport {
            level,
            error: error.clone(),
            config,
        });
        Ok(())
    }
}
