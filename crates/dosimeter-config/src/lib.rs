//! Configuration for the dosimeter pipeline.
//!
//! A single TOML file describes where the measurement lives, which column
//! holds the sound levels, where results go, and the numeric settings of a
//! run. Every field has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use dosimeter_config::{PipelineConfig, paths};
//!
//! let config = PipelineConfig::load("dosimeter.toml").unwrap();
//! config.validate().unwrap();
//! println!("reading {}", config.input.display());
//!
//! // Save the defaults next to the user's other configuration
//! PipelineConfig::default()
//!     .save(paths::default_config_path())
//!     .unwrap();
//! ```

mod error;
mod pipeline;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_config_path, find_config, user_config_dir};
pub use pipeline::{LoggingConfig, PipelineConfig};
