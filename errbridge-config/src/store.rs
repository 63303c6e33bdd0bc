//! Reloadable, read-mostly holder for the current settings snapshot.

use parking_lot::RwLock;

use crate::{ClientReportingConfig, ClientSettings, ReportingSettings, ServerReportingConfig};

/// Shared settings snapshot consulted on every event.
///
/// Readers always see a complete snapshot; [`SettingsStore::reload`] replaces it
/// atomically when the host persists new settings.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: RwLock<ReportingSettings>,
}

impl SettingsStore {
    pub fn new(settings: ReportingSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replaces the current snapshot.
    pub fn reload(&self, settings: ReportingSettings) {
        *self.settings.write() = settings;
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> ReportingSettings {
        self.settings.read().clone()
    }

    pub fn name(&self) -> String {
        self.settings.read().name.clone()
    }

    pub fn environment(&self) -> String {
        self.settings.read().environment.clone()
    }

    pub fn client_settings(&self) -> ClientSettings {
        self.settings.read().client.clone()
    }

    pub fn is_server_reporting_enabled(&self) -> bool {
        self.settings.read().is_server_reporting_enabled()
    }

    pub fn is_client_reporting_enabled(&self) -> bool {
        self.settings.read().is_client_reporting_enabled()
    }

    pub fn server_config(&self) -> Option<ServerReportingConfig> {
        self.settings.read().server_config()
    }

    pub fn client_config(&self) -> Option<ClientReportingConfig> {
        self.settings.read().client_config()
    }
}

impl From<ReportingSettings> for SettingsStore {
    fn from(settings: ReportingSettings) -> Self {
        Self::new(settings)
    }
}
