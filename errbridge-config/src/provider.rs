//! Settings providers: where persisted reporting settings come from.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use tracing::debug;

use crate::{ConfigError, ReportingSettings};

/// Trait for loading reporting settings from different sources.
pub trait ConfigProvider {
    /// Loads the settings sources and returns a Figment instance.
    fn load(&self) -> Result<Figment, ConfigError>;
}

/// Defaults, then `<dir>/errbridge.yaml`, then `<dir>/<environment>.yaml`,
/// then `ERRBRIDGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct LayeredProvider {
    config_dir: PathBuf,
}

impl LayeredProvider {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }
}

impl Default for LayeredProvider {
    fn default() -> Self {
        Self::new("config")
    }
}

impl ConfigProvider for LayeredProvider {
    fn load(&self) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ReportingSettings::default()));

        let base = self.config_dir.join("errbridge.yaml");
        if base.exists() {
            figment = figment.merge(Yaml::file(&base));
        } else {
            debug!(path = %base.display(), "base settings file not found, using defaults");
        }

        let env_file = self
            .config_dir
            .join(format!("{}.yaml", crate::current_environment()));
        if env_file.exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Ok(figment.merge(Env::prefixed("ERRBRIDGE_").split("__")))
    }
}

/// A single YAML file, overridable by `ERRBRIDGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigProvider for FileProvider {
    fn load(&self) -> Result<Figment, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::FileNotFound(self.path.clone()));
        }

        Ok(Figment::from(Serialized::defaults(ReportingSettings::default()))
            .merge(Yaml::file(&self.path))
            .merge(Env::prefixed("ERRBRIDGE_").split("__")))
    }
}
