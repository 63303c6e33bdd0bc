//! ## errbridge-core::reporting
//! **The reporting-client seam**
//!
//! [`ReportingClient`] is the external SDK as the bridge sees it: something
//! that can be initialized with a [`ServerReportingConfig`] and handed errors.
//! Transport, batching and retries are the client's business.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use errbridge_config::ServerReportingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ReportError;

pub mod memory;
pub mod session;

pub use memory::{MemoryReportingClient, RecordedReport};
pub use session::ReportingSession;

/// Severity attached to a submitted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which host hook produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSource {
    Exception,
    Job,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Exception => "exception",
            ReportSource::Job => "job",
        }
    }
}

/// External error-tracking client.
pub trait ReportingClient: Send + Sync {
    /// (Re)configures the client. Called lazily, and again whenever the
    /// derived configuration changes.
    fn init(&self, config: &ServerReportingConfig) -> Result<(), ReportError>;

    /// Submits one error report.
    fn report(&self, level: Level, error: &ReportableError) -> Result<(), ReportError>;
}

#[derive(Debug, Error)]
#[error("{0}")]
struct MessageError(String);

/// Opaque handle to an error surfaced by the host.
///
/// Clones share the underlying error value, which the bridge never inspects
/// or rewrites; [`ReportableError::ptr_eq`] tells whether two handles point at
/// the same value.
#[derive(Clone)]
pub struct ReportableError {
    source: Arc<dyn StdError + Send + Sync + 'static>,
    backtrace: Option<Arc<str>>,
    context: BTreeMap<String, String>,
}

impl ReportableError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(error),
            backtrace: None,
            context: BTreeMap::new(),
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    pub fn with_backtrace(mut self, backtrace: impl Into<String>) -> Self {
        self.backtrace = Some(Arc::from(backtrace.into()));
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn message(&self) -> String {
        self.source.to_string()
    }

    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn ptr_eq(&self, other: &ReportableError) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl fmt::Debug for ReportableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportableError")
            .field("message", &self.message())
            .field("has_backtrace", &self.backtrace.is_some())
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for ReportableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}
