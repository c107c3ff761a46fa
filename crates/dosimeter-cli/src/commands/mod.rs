//! CLI command implementations.

pub mod common;
pub mod config;
pub mod dose;
pub mod geojson;
pub mod integrate;
pub mod reduce;
pub mod run;
pub mod truncate;
