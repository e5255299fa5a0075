//! Configuration storage adapters.
//!
//! Both implement [`ConfigPort`]:
//!
//! | Adapter             | Backing            | Encoding   |
//! |---------------------|--------------------|------------|
//! | `JsonConfigFile`    | file on disk       | JSON       |
//! | `MemoryConfigStore` | in-process blob    | postcard   |
//!
//! Every field is range-checked before a config is returned or persisted.

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    cfg.validate().map_err(ConfigError::ValidationFailed)
}

// ───────────────────────────────────────────────────────────────
// JSON file
// ───────────────────────────────────────────────────────────────

/// Config stored as pretty JSON at a fixed path.  Missing fields take
/// their defaults; a missing file loads [`SystemConfig::default()`].
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", self.path.display());
                return Ok(SystemConfig::default());
            }
            Err(e) => {
                warn!("Config read failed at {}: {e}", self.path.display());
                return Err(ConfigError::IoError);
            }
        };
        let cfg: SystemConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config at {} is corrupted: {e}", self.path.display());
            ConfigError::Corrupted
        })?;
        validate_config(&cfg)?;
        info!("Config loaded from {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        std::fs::write(&self.path, text).map_err(|e| {
            warn!("Config write failed at {}: {e}", self.path.display());
            ConfigError::IoError
        })
    }
}

// ───────────────────────────────────────────────────────────────
// In-memory blob
// ───────────────────────────────────────────────────────────────

/// Keeps the config as a compact postcard blob, the way a key-value
/// preference store would.
#[derive(Default)]
pub struct MemoryConfigStore {
    blob: RefCell<Option<Vec<u8>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigPort for MemoryConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        match self.blob.borrow().as_deref() {
            None => Ok(SystemConfig::default()),
            Some(bytes) => postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted),
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::Corrupted)?;
        *self.blob.borrow_mut() = Some(bytes);
        Ok(())
    }
}
