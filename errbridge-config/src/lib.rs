//! # errbridge settings
//!
//! Persisted reporting settings for the error-reporting bridge and the
//! configurations derived from them.
//!
//! ## Features
//! - **Layered loading**: defaults, YAML files and `ERRBRIDGE_*` variables via `figment`
//! - **Validation**: tokens and identifiers are checked before they reach markup
//! - **Derived configs**: server and client configs computed on demand, never cached
//! - **Reloadable store**: [`SettingsStore`] swaps snapshots when the host saves settings

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

mod client;
mod de;
mod error;
mod provider;
mod server;
mod store;
mod validation;

pub use client::{ClientPayload, ClientReportingConfig, ClientSettings};
pub use error::ConfigError;
pub use provider::{ConfigProvider, FileProvider, LayeredProvider};
pub use server::{ServerReportingConfig, ServerSettings};
pub use store::SettingsStore;

/// Name of the environment variable holding the current environment name.
pub const ENVIRONMENT_VAR: &str = "ERRBRIDGE_ENV";

/// Returns the current environment name, `production` when unset.
pub fn current_environment() -> String {
    std::env::var(ENVIRONMENT_VAR)
        .ok()
        .map(|env| env.trim().to_owned())
        .filter(|env| !env.is_empty())
        .unwrap_or_else(|| "production".into())
}

/// Top‑level reporting settings.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ReportingSettings {
    /// Display name used in diagnostics.
    #[serde(default = "default_name", deserialize_with = "de::string_or_number")]
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    /// Environment name attached to every report.
    #[serde(
        default = "current_environment",
        deserialize_with = "de::string_or_number"
    )]
    #[validate(custom(function = validation::validate_environment))]
    pub environment: String,

    /// Server-side exception and job failure reporting.
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerSettings,

    /// Browser snippet injection.
    #[serde(default)]
    #[validate(nested)]
    pub client: ClientSettings,
}

fn default_name() -> String {
    "errbridge".into()
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            environment: current_environment(),
            server: ServerSettings::default(),
            client: ClientSettings::default(),
        }
    }
}

impl ReportingSettings {
    /// Load settings from `config/` and the environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/errbridge.yaml`, if present
    /// 3. `config/<ERRBRIDGE_ENV>.yaml`, if present
    /// 4. `ERRBRIDGE_*` environment variables (`__` separates nested keys)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&LayeredProvider::default())
    }

    /// Load settings from a specific file, still honouring `ERRBRIDGE_*` overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with(&FileProvider::new(path))
    }

    /// Load and validate settings from any provider.
    pub fn load_with(provider: &impl ConfigProvider) -> Result<Self, ConfigError> {
        provider
            .load()?
            .extract()
            .map_err(ConfigError::from)
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// True iff a non-empty server access token is configured.
    pub fn is_server_reporting_enabled(&self) -> bool {
        self.server.token().is_some()
    }

    /// True iff client reporting is switched on and a non-empty client token is configured.
    pub fn is_client_reporting_enabled(&self) -> bool {
        self.client.enabled && self.client.token().is_some()
    }

    /// Config for the reporting client, `None` while server reporting is disabled.
    pub fn server_config(&self) -> Option<ServerReportingConfig> {
        self.server.token().map(|token| ServerReportingConfig {
            access_token: token.to_owned(),
            environment: self.environment.clone(),
        })
    }

    /// Config for the browser SDK, `None` while client reporting is disabled.
    pub fn client_config(&self) -> Option<ClientReportingConfig> {
        if !self.client.enabled {
            return None;
        }
        self.client
            .token()
            .map(|token| ClientReportingConfig::new(token, self.environment.clone()))
    }

    /// Copy safe to display or log: tokens keep only their last four characters.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.server.access_token = copy.server.access_token.as_deref().map(mask);
        copy.client.access_token = copy.client.access_token.as_deref().map(mask);
        copy
    }
}

fn mask(token: &str) -> String {
    let visible: String = {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 4 {
            String::new()
        } else {
            chars[chars.len() - 4..].iter().collect()
        }
    };
    format!("****{}", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn settings(server: Option<&str>, client: Option<&str>, enabled: bool) -> ReportingSettings {
        ReportingSettings {
            environment: "production".into(),
            server: ServerSettings {
                access_token: server.map(Into::into),
            },
            client: ClientSettings {
                enabled,
                access_token: client.map(Into::into),
                ..ClientSettings::default()
            },
            ..ReportingSettings::default()
        }
    }

    #[test]
    fn default_settings_validate_and_disable_everything() {
        let settings = ReportingSettings::default();
        settings.validate().expect("Default settings should validate");
        assert!(!settings.is_server_reporting_enabled());
        assert!(!settings.is_client_reporting_enabled());
        assert_eq!(settings.server_config(), None);
        assert_eq!(settings.client_config(), None);
    }

    #[test]
    fn derives_server_config() {
        let settings = settings(Some("tok123"), None, false);
        assert_eq!(
            settings.server_config(),
            Some(ServerReportingConfig {
                access_token: "tok123".into(),
                environment: "production".into(),
            })
        );
    }

    #[test]
    fn client_needs_flag_and_token() {
        assert!(!settings(None, Some("jstok"), false).is_client_reporting_enabled());
        assert!(!settings(None, Some(""), true).is_client_reporting_enabled());
        assert!(!settings(None, None, true).is_client_reporting_enabled());

        let enabled = settings(None, Some("jstok"), true);
        assert!(enabled.is_client_reporting_enabled());
        let config = enabled.client_config().unwrap();
        assert_eq!(config.access_token, "jstok");
        assert!(config.capture_uncaught);
        assert_eq!(config.payload.environment, "production");
    }

    proptest::proptest! {
        #[test]
        fn enabled_flags_follow_tokens(
            server in proptest::option::of("[A-Za-z0-9]{0,8}"),
            client in proptest::option::of("[A-Za-z0-9]{0,8}"),
            enabled in proptest::bool::ANY,
        ) {
            let settings = settings(server.as_deref(), client.as_deref(), enabled);
            let server_on = server.as_deref().is_some_and(|t| !t.is_empty());
            let client_on = enabled && client.as_deref().is_some_and(|t| !t.is_empty());

            proptest::prop_assert_eq!(settings.is_server_reporting_enabled(), server_on);
            proptest::prop_assert_eq!(settings.server_config().is_some(), server_on);
            proptest::prop_assert_eq!(settings.is_client_reporting_enabled(), client_on);
            proptest::prop_assert_eq!(settings.client_config().is_some(), client_on);
        }
    }

    #[test]
    fn redacts_tokens() {
        let redacted = settings(Some("0123456789abcdef"), Some("abc"), true).redacted();
        assert_eq!(redacted.server.access_token.as_deref(), Some("****cdef"));
        assert_eq!(redacted.client.access_token.as_deref(), Some("****"));
    }

    #[test]
    fn layered_loading_with_environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/errbridge.yaml",
                r#"
                name: newism-rollbar
                server:
                  access_token: tok123
                client:
                  enabled: true
                  access_token: jstok
                "#,
            )?;
            jail.create_file(
                "config/staging.yaml",
                r#"
                client:
                  enabled: false
                "#,
            )?;
            jail.set_env("ERRBRIDGE_ENV", "staging");
            jail.set_env("ERRBRIDGE_SERVER__ACCESS_TOKEN", "fromenv");

            let settings = ReportingSettings::load().expect("settings should load");
            assert_eq!(settings.name, "newism-rollbar");
            assert_eq!(settings.environment, "staging");
            assert_eq!(settings.server.access_token.as_deref(), Some("fromenv"));
            assert!(!settings.is_client_reporting_enabled());
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ReportingSettings::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn invalid_token_fails_validation() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bridge.yaml",
                r#"
                client:
                  enabled: true
                  access_token: "</script><script>alert(1)"
                "#,
            )?;
            let err = ReportingSettings::load_from_path("bridge.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("client.access_token"));
            Ok(())
        });
    }

    #[test]
    fn numeric_tokens_from_environment_load_as_strings() {
        Jail::expect_with(|jail| {
            jail.create_file("bridge.yaml", "name: errbridge")?;
            jail.set_env("ERRBRIDGE_SERVER__ACCESS_TOKEN", "1234567890");
            jail.set_env("ERRBRIDGE_CLIENT__ACCESS_TOKEN", "42");

            let settings =
                ReportingSettings::load_from_path("bridge.yaml").expect("settings should load");
            assert_eq!(settings.server.access_token.as_deref(), Some("1234567890"));
            assert_eq!(settings.client.access_token.as_deref(), Some("42"));
            assert!(settings.is_server_reporting_enabled());
            Ok(())
        });
    }

    #[test]
    fn numeric_yaml_values_load_as_strings() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bridge.yaml",
                r#"
                environment: 2024
                server:
                  access_token: 987654321
                "#,
            )?;

            let settings =
                ReportingSettings::load_from_path("bridge.yaml").expect("settings should load");
            assert_eq!(settings.environment, "2024");
            assert_eq!(
                settings.server_config(),
                Some(ServerReportingConfig {
                    access_token: "987654321".into(),
                    environment: "2024".into(),
                })
            );
            Ok(())
        });
    }

    #[test]
    fn environment_variable_is_trimmed() {
        Jail::expect_with(|jail| {
            jail.set_env(ENVIRONMENT_VAR, " staging ");
            assert_eq!(current_environment(), "staging");
            ReportingSettings::default()
                .validate()
                .expect("trimmed environment should validate");

            jail.set_env(ENVIRONMENT_VAR, "   ");
            assert_eq!(current_environment(), "production");
            Ok(())
        });
    }
}
