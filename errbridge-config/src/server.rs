//! Server-side reporting settings.
//!
//! The server access token authorizes the reporting client to submit
//! exceptions and job failures.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Persisted server reporting settings.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Server access token. Absent or empty disables server reporting.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::de::optional_string_or_number"
    )]
    #[validate(custom(function = validation::validate_access_token))]
    pub access_token: Option<String>,
}

impl ServerSettings {
    /// Returns the configured token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Configuration handed to the reporting client on initialization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct ServerReportingConfig {
    pub access_token: String,
    pub environment: String,
}
