#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Process bootstrap helpers for the storage node daemon
//!
//! - [`config`]: layered configuration (defaults, YAML, env, CLI)
//! - [`logging`]: `tracing` subscriber setup
//! - [`paths`]: local state directory normalization
//! - [`signals`]: shutdown signal handling

pub mod config;
pub mod logging;
pub mod paths;
pub mod signals;

pub use config::{
    AdminConfig, AppConfig, CliArgs, ConfigError, CoordinationConfig, DEFAULT_ADMIN_PORT,
    DEFAULT_COORDINATION_PORT, ENV_PREFIX, LogFormat, LoggingConfig, NodeConfig,
};
pub use logging::init_logging;
pub use paths::{StateDirError, expand_tilde, resolve_state_dir};
pub use signals::{ShutdownSignal, wait_for_shutdown};
