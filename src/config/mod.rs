//! Configuration module.
//!
//! Provides `GestureConfig` (top-level settings) with one section per
//! subsystem, `AppPaths` for the platform config directory, and TOML
//! persistence via `GestureConfig::load` / `GestureConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ConfigError, GestureConfig, SessionConfig};
