#![allow(dead_code)]

use std::sync::Arc;

use errbridge_config::{ClientSettings, ReportingSettings, ServerSettings, SettingsStore};
use errbridge_core::events::LocalEventBus;
use errbridge_core::reporting::MemoryReportingClient;
use errbridge_core::Bridge;

pub struct Harness {
    pub bridge: Bridge,
    pub bus: LocalEventBus,
    pub client: Arc<MemoryReportingClient>,
}

pub fn settings(
    server: Option<&str>,
    client: Option<&str>,
    client_enabled: bool,
    environment: &str,
) -> ReportingSettings {
    ReportingSettings {
        name: "errbridge".into(),
        environment: environment.into(),
        server: ServerSettings {
            access_token: server.map(Into::into),
        },
        client: ClientSettings {
            enabled: client_enabled,
            access_token: client.map(Into::into),
            ..ClientSettings::default()
        },
    }
}

/// Bridge initialized on a fresh bus, backed by an in-memory client.
pub fn harness(settings: ReportingSettings) -> Harness {
    let client = Arc::new(MemoryReportingClient::new());
    let bridge = Bridge::with_defaults(Arc::new(SettingsStore::new(settings)), client.clone())
        .expect("bridge should build");
    let bus = LocalEventBus::new();
    bridge.initialize(&bus);
    Harness {
        bridge,
        bus,
        client,
    }
}
