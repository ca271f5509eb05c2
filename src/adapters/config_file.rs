//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] over a JSON file on disk.  Missing fields take
//! their defaults; a missing file is [`ConfigError::NotFound`] so the caller
//! can fall back to [`ThermostatConfig::default`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ThermostatConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ThermostatConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("Config read failed ({}): {}", self.path.display(), e);
                ConfigError::IoError
            }
        })?;
        let config: ThermostatConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config parse failed ({}): {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        debug!("Config loaded from {}", self.path.display());
        Ok(config)
    }
}
