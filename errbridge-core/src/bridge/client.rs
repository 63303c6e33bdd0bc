//! Injects the browser SDK snippet into rendered pages.

use std::sync::Arc;

use errbridge_config::SettingsStore;
use errbridge_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::events::RenderEvent;
use crate::script::ScriptHelper;
use crate::view::Position;

/// Registration key of the snippet; the view drops repeated registrations.
pub const SNIPPET_KEY: &str = "errbridge-client-snippet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    /// This response already carries the snippet.
    AlreadyPresent,
    Disabled,
    Failed,
}

pub struct ClientScriptInjector {
    settings: Arc<SettingsStore>,
    helper: Arc<dyn ScriptHelper>,
    metrics: MetricsRecorder,
}

impl ClientScriptInjector {
    pub fn new(
        settings: Arc<SettingsStore>,
        helper: Arc<dyn ScriptHelper>,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            settings,
            helper,
            metrics,
        }
    }

    /// Config tag followed by the init snippet, or `None` while client
    /// reporting is disabled.
    pub fn markup(&self) -> Result<Option<String>, BridgeError> {
        let Some(config) = self.settings.client_config() else {
            return Ok(None);
        };
        let tag = self.helper.config_tag(&config)?;
        let snippet = self.helper.init_snippet(&config)?;
        Ok(Some(tag + &snippet))
    }

    pub fn on_before_render(&self, event: &RenderEvent) -> InjectOutcome {
        let markup = match self.markup() {
            Ok(Some(markup)) => markup,
            Ok(None) => {
                debug!(template = %event.template, "client reporting disabled, not injecting");
                return InjectOutcome::Disabled;
            }
            Err(e) => {
                warn!(template = %event.template, error = %e, "failed to render client snippet");
                return InjectOutcome::Failed;
            }
        };

        if !event
            .view
            .register_markup(SNIPPET_KEY, markup, Position::Head)
        {
            return InjectOutcome::AlreadyPresent;
        }

        self.metrics.inc_injected();
        EventLogger::record(
            "script_injected",
            &[
                KeyValue::new("template", event.template.clone()),
                KeyValue::new("environment", self.settings.environment()),
            ],
        );
        InjectOutcome::Injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DefaultScriptHelper;
    use crate::view::InMemoryView;
    use errbridge_config::{ClientSettings, ReportingSettings};

    fn injector(enabled: bool, token: Option<&str>) -> ClientScriptInjector {
        let settings = Arc::new(SettingsStore::new(ReportingSettings {
            environment: "production".into(),
            client: ClientSettings {
                enabled,
                access_token: token.map(Into::into),
                ..ClientSettings::default()
            },
            ..ReportingSettings::default()
        }));
        let helper = Arc::new(DefaultScriptHelper::new(Arc::clone(&settings)));
        ClientScriptInjector::new(settings, helper, MetricsRecorder::new().unwrap())
    }

    fn render(view: &Arc<InMemoryView>) -> RenderEvent {
        RenderEvent {
            template: "index.twig".into(),
            view: view.clone(),
        }
    }

    #[test]
    fn injects_once_per_response() {
        let injector = injector(true, Some("jstok"));
        let view = Arc::new(InMemoryView::new());

        assert_eq!(injector.on_before_render(&render(&view)), InjectOutcome::Injected);
        assert_eq!(
            injector.on_before_render(&render(&view)),
            InjectOutcome::AlreadyPresent
        );

        let head = view.markup_at(Position::Head);
        assert_eq!(head.len(), 1);
        assert!(head[0].starts_with("<script>var _rollbarConfig = "));
        assert!(head[0].contains("\"accessToken\":\"jstok\""));
        assert!(head[0].contains("\"environment\":\"production\""));
        assert!(head[0].ends_with("</script>"));
    }

    #[test]
    fn disabled_without_flag_or_token() {
        for injector in [injector(false, Some("jstok")), injector(true, None)] {
            let view = Arc::new(InMemoryView::new());
            assert_eq!(injector.on_before_render(&render(&view)), InjectOutcome::Disabled);
            assert!(view.is_empty());
        }
    }
}
