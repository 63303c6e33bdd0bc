//! # errbridge-core
//!
//! Error-reporting bridge: observes a host application's error and render
//! events, filters them through the reporting settings, and hands them to an
//! external error-tracking client or injects its browser snippet.
//!
//! ### Key Submodules:
//! - `events`: host event types, the [`HostEventBus`](events::HostEventBus) seam and an in-process bus
//! - `reporting`: the [`ReportingClient`](reporting::ReportingClient) seam and lazy client initialization
//! - `script`/`view`: client snippet rendering and head markup registration
//! - `bridge`: the subscribers and the one-shot lifecycle wiring them up

pub mod bridge;
pub mod error;
pub mod events;
pub mod reporting;
pub mod script;
pub mod view;

pub use bridge::{Bridge, Registration};
pub use error::{BridgeError, ReportError};
