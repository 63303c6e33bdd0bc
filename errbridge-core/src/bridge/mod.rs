//! ## errbridge-core::bridge
//! **Wires the subscribers onto a host event bus**
//!
//! A [`Bridge`] is built once from the settings store and the two external
//! collaborators, then [`Bridge::initialize`] subscribes three callbacks:
//!
//! | Event          | Callback                                  |
//! |----------------|-------------------------------------------|
//! | `Exception`    | [`ServerErrorSubscriber::on_exception`]   |
//! | `JobError`     | [`ServerErrorSubscriber::on_job_error`]   |
//! | `BeforeRender` | [`ClientScriptInjector::on_before_render`] |
//!
//! Whether a callback does anything is decided when the event fires, from the
//! settings current at that moment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use errbridge_config::{ClientReportingConfig, ServerReportingConfig, SettingsStore};
use errbridge_telemetry::MetricsRecorder;
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::events::{EventKind, HostEvent, HostEventBus, SubscriptionId};
use crate::reporting::ReportingClient;
use crate::script::{DefaultScriptHelper, ScriptHelper};

pub mod client;
pub mod server;

pub use client::{ClientScriptInjector, InjectOutcome, SNIPPET_KEY};
pub use server::{ForwardOutcome, ServerErrorSubscriber};

/// Subscriptions created by the first successful [`Bridge::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
    pub exception: SubscriptionId,
    pub job_error: SubscriptionId,
    pub before_render: SubscriptionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered(Subscriptions),
    /// `initialize` already ran for this bridge; nothing was subscribed.
    AlreadyRegistered,
}

pub struct Bridge {
    settings: Arc<SettingsStore>,
    server: Arc<ServerErrorSubscriber>,
    client: Arc<ClientScriptInjector>,
    metrics: MetricsRecorder,
    registered: AtomicBool,
}

impl Bridge {
    pub fn new(
        settings: Arc<SettingsStore>,
        client: Arc<dyn ReportingClient>,
        helper: Arc<dyn ScriptHelper>,
        metrics: MetricsRecorder,
    ) -> Self {
        let server = ServerErrorSubscriber::new(Arc::clone(&settings), client, metrics.clone());
        let injector = ClientScriptInjector::new(Arc::clone(&settings), helper, metrics.clone());
        Self {
            settings,
            server: Arc::new(server),
            client: Arc::new(injector),
            metrics,
            registered: AtomicBool::new(false),
        }
    }

    /// Bridge with the default script helper and a fresh metrics registry.
    pub fn with_defaults(
        settings: Arc<SettingsStore>,
        client: Arc<dyn ReportingClient>,
    ) -> Result<Self, BridgeError> {
        let helper = Arc::new(DefaultScriptHelper::new(Arc::clone(&settings)));
        Ok(Self::new(settings, client, helper, MetricsRecorder::new()?))
    }

    /// Subscribes the bridge's callbacks on `bus`. Only the first call per
    /// bridge subscribes anything.
    pub fn initialize(&self, bus: &dyn HostEventBus) -> Registration {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("bridge already initialized, skipping listener registration");
            return Registration::AlreadyRegistered;
        }

        let name = self.settings.name();
        info!(plugin = %name, "{} plugin loaded", name);

        let server = Arc::clone(&self.server);
        let exception = bus.subscribe(
            EventKind::Exception,
            Arc::new(move |event: &HostEvent| {
                if let HostEvent::Exception(exception) = event {
                    server.on_exception(exception);
                }
            }),
        );

        let server = Arc::clone(&self.server);
        let job_error = bus.subscribe(
            EventKind::JobError,
            Arc::new(move |event: &HostEvent| {
                if let HostEvent::JobError(failure) = event {
                    server.on_job_error(failure);
                }
            }),
        );

        let client = Arc::clone(&self.client);
        let before_render = bus.subscribe(
            EventKind::BeforeRender,
            Arc::new(move |event: &HostEvent| {
                if let HostEvent::BeforeRender(render) = event {
                    client.on_before_render(render);
                }
            }),
        );

        Registration::Registered(Subscriptions {
            exception,
            job_error,
            before_render,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn server_config(&self) -> Option<ServerReportingConfig> {
        self.settings.server_config()
    }

    pub fn client_config(&self) -> Option<ClientReportingConfig> {
        self.settings.client_config()
    }

    pub fn is_server_reporting_enabled(&self) -> bool {
        self.settings.is_server_reporting_enabled()
    }

    pub fn is_client_reporting_enabled(&self) -> bool {
        self.settings.is_client_reporting_enabled()
    }

    pub fn server(&self) -> &ServerErrorSubscriber {
        &self.server
    }

    pub fn injector(&self) -> &ClientScriptInjector {
        &self.client
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}
