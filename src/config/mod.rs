// Configuration module entry point
// Built-in defaults overridden by DEVSERVE_* environment variables

mod types;

use config::{ConfigError, Environment};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub use types::{Config, LoggingConfig, ServerConfig};

/// Prefix of the environment variables read at startup, e.g. `DEVSERVE_SERVER__PORT`
pub const ENV_PREFIX: &str = "DEVSERVE";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8002;

impl Config {
    /// Load configuration from defaults and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(Self::environment())
    }

    /// Load configuration from defaults and the given environment source
    pub fn load_with(env: Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", ".")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .add_source(env)
            .build()?;

        settings.try_deserialize()
    }

    /// Environment source: `DEVSERVE_` prefix, `__` between nested keys
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Listen address; `host` is a bare IP, so IPv6 hosts such as `::` need no brackets
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Resolve the served directory against the current working directory.
    ///
    /// Fails when the directory does not exist, so a typo is reported at
    /// startup instead of as a 404 on every request.
    pub fn root_dir(&self) -> io::Result<PathBuf> {
        let root = if self.server.root.is_absolute() {
            self.server.root.clone()
        } else {
            std::env::current_dir()?.join(&self.server.root)
        };

        if root.is_dir() {
            Ok(root)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Root directory not found: {}", root.display()),
            ))
        }
    }
}
