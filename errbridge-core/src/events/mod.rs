//! ## errbridge-core::events
//! **Host lifecycle events and the subscription seam**
//!
//! The bridge never depends on a host framework directly. It only needs
//! something implementing [`HostEventBus`] that lets it register a callback
//! for a named event; [`LocalEventBus`] is the in-process implementation.

use std::fmt;
use std::sync::Arc;

use crate::reporting::ReportableError;
use crate::view::View;

pub mod bus;

pub use bus::LocalEventBus;

/// Host events the bridge listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired before the host handles or displays an unhandled exception.
    Exception,
    /// Fired by the job queue after a job raised during execution.
    JobError,
    /// Fired once per template render, before output is produced.
    BeforeRender,
}

#[derive(Debug, Clone)]
pub struct ExceptionEvent {
    pub error: ReportableError,
}

#[derive(Debug, Clone)]
pub struct JobErrorEvent {
    pub job: String,
    pub attempt: u32,
    pub error: ReportableError,
}

#[derive(Clone)]
pub struct RenderEvent {
    pub template: String,
    /// Markup registration surface of the response being rendered.
    pub view: Arc<dyn View>,
}

impl fmt::Debug for RenderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEvent")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum HostEvent {
    Exception(ExceptionEvent),
    JobError(JobErrorEvent),
    BeforeRender(RenderEvent),
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Exception(_) => EventKind::Exception,
            HostEvent::JobError(_) => EventKind::JobError,
            HostEvent::BeforeRender(_) => EventKind::BeforeRender,
        }
    }

    pub fn exception(error: ReportableError) -> Self {
        HostEvent::Exception(ExceptionEvent { error })
    }

    pub fn job_error(job: impl Into<String>, attempt: u32, error: ReportableError) -> Self {
        HostEvent::JobError(JobErrorEvent {
            job: job.into(),
            attempt,
            error,
        })
    }

    pub fn before_render(template: impl Into<String>, view: Arc<dyn View>) -> Self {
        HostEvent::BeforeRender(RenderEvent {
            template: template.into(),
            view,
        })
    }
}

/// Callback registered for one [`EventKind`].
pub type Listener = Arc<dyn Fn(&HostEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Anything that lets the bridge subscribe to named host events.
pub trait HostEventBus {
    fn subscribe(&self, kind: EventKind, listener: Listener) -> SubscriptionId;
}
