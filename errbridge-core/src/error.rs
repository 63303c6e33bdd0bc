use thiserror::Error;

/// Failures surfaced by a [`ReportingClient`](crate::reporting::ReportingClient).
///
/// The bridge never retries these; they are logged and counted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Reporting client used before initialization")]
    NotInitialized,

    #[error("Report rejected: {0}")]
    Rejected(String),
}

/// Failures while building a [`Bridge`](crate::Bridge) or rendering its markup.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Markup rendering error: {0}")]
    Markup(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
