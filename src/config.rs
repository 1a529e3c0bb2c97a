//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags (each of which can also come from the environment).
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:4221"
//!   idle_timeout_secs: 5
//! files:
//!   directory: /srv/files
//! ```
//!
//! The resolved [`Config`] is built once in `main` and never changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4221";
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DIRECTORY: &str = "/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Root directory for `/files/` reads and writes
    pub directory: PathBuf,
}

/// Command-line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "courier", version, about = "Minimal HTTP/1.1 server")]
pub struct Cli {
    /// Directory served under /files/
    #[arg(long, env = "COURIER_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Address to listen on (host:port)
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,

    /// Seconds a connection may idle before it is closed
    #[arg(long, env = "COURIER_IDLE_TIMEOUT")]
    pub idle_timeout_secs: Option<u64>,

    /// YAML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Config {
    /// Parses the process arguments and resolves the final configuration.
    pub fn load() -> anyhow::Result<Self> {
        Self::resolve(Cli::parse())
    }

    /// Applies `cli` on top of the file it names (if any) and the defaults.
    pub fn resolve(cli: Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(directory) = cli.directory {
            cfg.files.directory = directory;
        }
        if let Some(listen) = cli.listen {
            cfg.server.listen_addr = listen;
        }
        if let Some(secs) = cli.idle_timeout_secs {
            cfg.server.idle_timeout_secs = secs;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.server.listen_addr.trim().is_empty(),
            "listen address must not be empty"
        );
        ensure!(
            self.server.idle_timeout_secs > 0,
            "idle timeout must be at least one second"
        );
        Ok(())
    }
}
