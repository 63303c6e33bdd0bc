//! Client-side (browser) reporting settings.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Persisted client-side reporting settings.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Master switch for snippet injection.
    #[serde(default)]
    pub enabled: bool,

    /// Client ("post client item") access token. Absent or empty disables injection.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::de::optional_string_or_number"
    )]
    #[validate(custom(function = validation::validate_access_token))]
    pub access_token: Option<String>,

    /// Location of the browser SDK loaded by the init snippet.
    #[serde(default = "default_script_url")]
    #[validate(url)]
    pub script_url: String,

    /// Global the browser SDK reads its configuration from.
    #[serde(default = "default_config_global")]
    #[validate(custom(function = validation::validate_js_identifier))]
    pub config_global: String,
}

fn default_script_url() -> String {
    "https://cdn.rollbar.com/rollbarjs/refs/tags/v2.26.4/rollbar.min.js".into()
}

fn default_config_global() -> String {
    "_rollbarConfig".into()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: None,
            script_url: default_script_url(),
            config_global: default_config_global(),
        }
    }
}

impl ClientSettings {
    /// Returns the configured token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Configuration embedded into the page for the browser SDK.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientReportingConfig {
    pub access_token: String,
    pub capture_uncaught: bool,
    pub payload: ClientPayload,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientPayload {
    pub environment: String,
}

impl ClientReportingConfig {
    pub fn new(access_token: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            capture_uncaught: true,
            payload: ClientPayload {
                environment: environment.into(),
            },
        }
    }

    /// Renders the configuration as a JSON object literal.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
