//! Effect expiry configuration resource.
//!
//! Settings are loaded from an INI file. Missing keys keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [effects]
//! check_interval_ms = 100
//! empty_collections = keep
//!
//! [simulation]
//! tick_ms = 16
//! duration_ms = 5000
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default safe values for startup
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 100;
const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_DURATION_MS: u64 = 5000;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// What happens to a collection a sweep left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCollectionPolicy {
    /// Leave the empty component on the entity.
    #[default]
    Keep,
    /// Remove the component from the entity.
    Detach,
}

impl FromStr for EmptyCollectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(EmptyCollectionPolicy::Keep),
            "detach" => Ok(EmptyCollectionPolicy::Detach),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for EmptyCollectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyCollectionPolicy::Keep => f.write_str("keep"),
            EmptyCollectionPolicy::Detach => f.write_str("detach"),
        }
    }
}

/// Effect expiry configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct EffectConfig {
    /// Minimum game time between two sweeps, also the per-sweep decrement.
    pub check_interval_ms: u64,
    pub empty_collections: EmptyCollectionPolicy,
    /// Driver tick length in milliseconds.
    pub tick_ms: u64,
    /// Total simulated time for the driver.
    pub duration_ms: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            empty_collections: EmptyCollectionPolicy::Keep,
            tick_ms: DEFAULT_TICK_MS,
            duration_ms: DEFAULT_DURATION_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|message| ConfigError::Load {
            path: self.config_path.clone(),
            message,
        })?;

        // [effects] section
        if let Some(interval) = config.getuint("effects", "check_interval_ms").ok().flatten() {
            if interval == 0 {
                return Err(ConfigError::InvalidValue {
                    section: "effects",
                    key: "check_interval_ms",
                    value: interval.to_string(),
                });
            }
            self.check_interval_ms = interval;
        }
        if let Some(policy) = config.get("effects", "empty_collections") {
            self.empty_collections =
                policy.parse::<EmptyCollectionPolicy>().map_err(|value| ConfigError::InvalidValue {
                    section: "effects",
                    key: "empty_collections",
                    value,
                })?;
        }

        // [simulation] section
        if let Some(tick) = config.getuint("simulation", "tick_ms").ok().flatten() {
            self.tick_ms = tick;
        }
        if let Some(duration) = config.getuint("simulation", "duration_ms").ok().flatten() {
            self.duration_ms = duration;
        }

        info!(
            "Loaded config: check_interval={}ms, empty_collections={}, tick={}ms, duration={}ms",
            self.check_interval_ms, self.empty_collections, self.tick_ms, self.duration_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [effects] section
        config.set(
            "effects",
            "check_interval_ms",
            Some(self.check_interval_ms.to_string()),
        );
        config.set(
            "effects",
            "empty_collections",
            Some(self.empty_collections.to_string()),
        );

        // [simulation] section
        config.set("simulation", "tick_ms", Some(self.tick_ms.to_string()));
        config.set("simulation", "duration_ms", Some(self.duration_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Number of driver ticks needed to cover `duration_ms`.
    pub fn tick_count(&self) -> u64 {
        if self.tick_ms == 0 {
            return 0;
        }
        self.duration_ms.div_ceil(self.tick_ms)
    }
}
