//! Layered server configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, `FLIGHTS__*` environment variables (`__` separates nesting
//! levels, e.g. `FLIGHTS__SERVER__PORT`), then command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use flights::FlightsConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "FLIGHTS__";

/// In-memory database used by `--mock`.
pub const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub flights: FlightsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the flight routes are mounted under.
    pub base_path: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            base_path: "/flights".to_owned(),
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://flights.db?mode=rwc".to_owned(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
    pub seed: bool,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then the environment.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or does not fit the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
        if cli.mock {
            MOCK_DSN.clone_into(&mut self.database.dsn);
            self.database.max_connections = 1;
        }
        if cli.seed {
            self.flights.seed_demo_data = true;
        }
    }

    /// Checks that cannot be expressed in the schema.
    ///
    /// # Errors
    /// Describes the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let base = &self.server.base_path;
        if !base.starts_with('/') {
            anyhow::bail!("server.base_path must start with '/', got '{base}'");
        }
        if base.len() > 1 && base.ends_with('/') {
            anyhow::bail!("server.base_path must not end with '/', got '{base}'");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        if self.flights.stream_chunk_size == 0 {
            anyhow::bail!("flights.stream_chunk_size must be at least 1");
        }
        Ok(())
    }

    /// Effective configuration as YAML. Secrets are redacted.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.base_path, "/flights");
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliOverrides {
            port: Some(9000),
            verbose: 2,
            mock: true,
            seed: true,
        });
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.database.dsn, MOCK_DSN);
        assert_eq!(cfg.database.max_connections, 1);
        assert!(cfg.flights.seed_demo_data);
    }

    #[test]
    fn yaml_and_env_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "flights.yaml",
                r"
server:
  port: 7000
flights:
  stream_chunk_size: 10
  aircraft:
    base_url: http://aircraft.internal/aircraft
",
            )?;
            jail.set_env("FLIGHTS__SERVER__PORT", "7001");
            jail.set_env("FLIGHTS__LOGGING__FORMAT", "json");

            let cfg = AppConfig::load(Some(Path::new("flights.yaml"))).unwrap();
            assert_eq!(cfg.server.port, 7001);
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.flights.stream_chunk_size, 10);
            assert_eq!(
                cfg.flights.aircraft.base_url,
                "http://aircraft.internal/aircraft"
            );
            assert_eq!(cfg.server.host, "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "server:\n  prot: 1\n")?;
            assert!(AppConfig::load(Some(Path::new("bad.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn bad_base_path_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.base_path = "flights".to_owned();
        assert!(cfg.validate().is_err());
        cfg.server.base_path = "/flights/".to_owned();
        assert!(cfg.validate().is_err());
        cfg.server.base_path = "/".to_owned();
        cfg.validate().unwrap();
    }

    #[test]
    fn yaml_dump_redacts_password() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("[REDACTED]"));
        assert!(yaml.contains("base_path"));
    }
}
