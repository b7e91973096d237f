//! # Engine Configuration
//!
//! Tunables for the background workers and the demo loop. None of these are
//! load-bearing for correctness; they trade latency against idle CPU use and
//! pick which biome drives terrain generation.
//!
//! Configuration is plain JSON:
//!
//! ```json
//! {
//!     "generator": { "idle_interval_ms": 100, "seed": 7, "active_biome": "core:plains" },
//!     "mesher": { "idle_interval_ms": 100 },
//!     "view_radius": 2
//! }
//! ```
//!
//! Missing fields fall back to their defaults; unknown fields are rejected.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Sleep applied by a worker whose request queue is empty.
pub const DEFAULT_IDLE_INTERVAL_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub idle_interval_ms: u64,
    /// Seed fed to the terrain noise. Same seed, same terrain.
    pub seed: u32,
    /// Name of the biome definition used for every column.
    pub active_biome: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            seed: 0,
            active_biome: String::from("core:plains"),
        }
    }
}

impl GeneratorConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MesherConfig {
    pub idle_interval_ms: u64,
}

impl Default for MesherConfig {
    fn default() -> Self {
        MesherConfig {
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
        }
    }
}

impl MesherConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

/// Top-level configuration for an `EngineState` and the demo loop in `run()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub generator: GeneratorConfig,
    pub mesher: MesherConfig,
    /// Chunks within this square radius of the origin are requested by `run()`.
    pub view_radius: i32,
    pub tick_interval_ms: u64,
    pub max_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            generator: GeneratorConfig::default(),
            mesher: MesherConfig::default(),
            view_radius: 1,
            tick_interval_ms: 16,
            max_ticks: 2000,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration document.
    ///
    /// # Arguments
    /// * `json` - JSON text; absent fields take their defaults
    ///
    /// # Returns
    /// The parsed configuration, or `ConfigError::Parse` if the document is malformed
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.generator.idle_interval(), Duration::from_millis(200));
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = EngineConfig::from_json_str(
            r#"{ "generator": { "seed": 42 }, "mesher": { "idle_interval_ms": 5 } }"#,
        )
        .unwrap();

        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.active_biome, "core:plains");
        assert_eq!(config.mesher.idle_interval_ms, 5);
        assert_eq!(config.view_radius, 1);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "render_distance": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here/engine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
