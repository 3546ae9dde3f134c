// src/config/mod.rs

//! Configuration loading and validation for procwatch.
//!
//! - TOML-backed data model (`model.rs`).
//! - Loading from disk (`loader.rs`).
//! - Validation into the typed [`ConfigFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, MonitorConfig, MonitorSection, QuerySection, RawConfigFile, SourceSection};
pub use validate::parse_duration;
