//! k1-config
//!
//! Persistent learner preferences: display settings, game pacing, and the
//! last worksheet name. Owns the Config data structure plus disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AccessibilitySettings, Config, Theme};
