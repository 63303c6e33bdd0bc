//! Client-side helper: renders the browser SDK configuration and loader.

use std::sync::Arc;

use errbridge_config::{ClientReportingConfig, SettingsStore};

use crate::error::BridgeError;

/// Builds the two markup fragments injected into the page head.
pub trait ScriptHelper: Send + Sync {
    /// `<script>` assigning the client configuration to the SDK's global.
    fn config_tag(&self, config: &ClientReportingConfig) -> Result<String, BridgeError>;

    /// `<script>` loading and starting the browser SDK.
    fn init_snippet(&self, config: &ClientReportingConfig) -> Result<String, BridgeError>;
}

/// Reads the SDK location and config global from the current settings on
/// every call, so a settings reload is picked up on the next render.
pub struct DefaultScriptHelper {
    settings: Arc<SettingsStore>,
}

impl DefaultScriptHelper {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self { settings }
    }
}

impl ScriptHelper for DefaultScriptHelper {
    fn config_tag(&self, config: &ClientReportingConfig) -> Result<String, BridgeError> {
        let client = self.settings.client_settings();
        let json = escape_script_json(&config.to_json()?);
        Ok(format!(
            "<script>var {} = {};</script>",
            client.config_global, json
        ))
    }

    fn init_snippet(&self, _config: &ClientReportingConfig) -> Result<String, BridgeError> {
        let client = self.settings.client_settings();
        Ok(format!(
            "<script async crossorigin=\"anonymous\" src=\"{}\"></script>",
            escape_attribute(&client.script_url)
        ))
    }
}

// JSON inside a <script> element must not contain a literal `</script>` or `<!--`.
fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
