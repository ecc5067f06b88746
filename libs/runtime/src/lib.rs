//! Process-level plumbing shared by the blog binaries: layered configuration,
//! home directory resolution and logging setup.

pub mod config;
pub mod home_dir;
pub mod logging;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section};
