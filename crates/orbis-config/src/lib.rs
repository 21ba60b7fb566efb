//! Configuration for Orbis planets.
//!
//! Every generation parameter persists to disk as a RON file. Supports CLI
//! overrides via clap, change detection on reload, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, default_config_dir};
pub use error::ConfigError;
