//! # Core Module
//!
//! Crate-wide plumbing shared by every part of the pipeline.
//!
//! ## Key Components
//! - `error`: The error taxonomy and the crate `Result` alias
//! - `config`: Engine configuration, loaded from JSON
//!
//! ## Usage
//! ```rust
//! use chunk_pipeline::core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "view_radius": 2 }"#)?;
//! assert_eq!(config.view_radius, 2);
//! assert_eq!(config.mesher.idle_interval_ms, 200);
//! # Ok::<(), chunk_pipeline::core::error::ConfigError>(())
//! ```

pub mod config;
pub mod error;
