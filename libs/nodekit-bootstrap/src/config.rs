//! Layered daemon configuration
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. YAML file (if provided)
//! 3. environment variables prefixed with `STORAGED__` (`__` separates sections)
//! 4. CLI overrides

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "STORAGED__";

/// Well-known client port of the coordination store
pub const DEFAULT_COORDINATION_PORT: u16 = 2379;

/// Default port of the administrative API
pub const DEFAULT_ADMIN_PORT: u16 = 24007;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("failed to render configuration: {0}")]
    Render(String),
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub coordination: CoordinationConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

/// Node-local settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Directory holding node-local state (node id, ...). `~` is expanded.
    pub local_state_dir: String,
    /// Address advertised to peers. Detected from the default route when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise_address: Option<IpAddr>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            local_state_dir: "~/.storaged".to_owned(),
            advertise_address: None,
        }
    }
}

/// Coordination store client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinationConfig {
    pub port: u16,
    /// Key prefix under which this daemon keeps its data
    pub prefix: String,
    /// Probe the store's `/version` endpoint when connecting
    pub probe: bool,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_COORDINATION_PORT,
            prefix: "storaged/".to_owned(),
            probe: true,
        }
    }
}

/// Administrative API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    pub listen_addr: SocketAddr,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_ADMIN_PORT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,nodekit_context=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// CLI arguments that feed into configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub print_config: bool,
    pub verbose: u8,
}

impl AppConfig {
    /// Load defaults, then the YAML file (if any), then `STORAGED__*` env.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file is missing or any layer fails to parse.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// `-v` info, `-vv` debug, `-vvv` trace. Zero keeps the configured level.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let level = match args.verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}
