//! Configuration for the server and the CLI.
//!
//! Values come from command line arguments; an optional TOML file given with
//! `--config` overrides them field by field.

mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Context, Result};
use clap::Args;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATA_ROOT: &str = "assets";
pub const DEFAULT_DATASET: &str = "ml-latest-small";
pub const DEFAULT_SEARCH_LOG: &str = "search_logs.json";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Command line arguments shared by every binary in the workspace.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Directory holding dataset folders
    #[arg(long, default_value = DEFAULT_DATA_ROOT)]
    pub data_root: PathBuf,

    /// Dataset folder name under the data root
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Search log file
    #[arg(long, default_value = DEFAULT_SEARCH_LOG)]
    pub search_log: PathBuf,

    /// HTTP port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Optional TOML config file overriding the values above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the config file, if any, and resolve the final configuration
    pub fn resolve(&self) -> Result<AppConfig> {
        let file_config = self
            .config
            .as_deref()
            .map(FileConfig::load)
            .transpose()?;
        AppConfig::resolve(&self.cli_config(), file_config)
    }

    pub fn cli_config(&self) -> CliConfig {
        CliConfig {
            data_root: self.data_root.clone(),
            dataset: self.dataset.clone(),
            search_log: self.search_log.clone(),
            port: self.port,
            bind: self.bind.clone(),
        }
    }
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            dataset: DEFAULT_DATASET.to_string(),
            search_log: PathBuf::from(DEFAULT_SEARCH_LOG),
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            config: None,
        }
    }
}

/// CLI values that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_root: PathBuf,
    pub dataset: String,
    pub search_log: PathBuf,
    pub port: u16,
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_root: PathBuf,
    pub dataset: String,
    pub search_log: PathBuf,
    pub port: u16,
    pub bind: IpAddr,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_root = file
            .data_root
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.data_root.clone());
        let dataset = file.dataset.unwrap_or_else(|| cli.dataset.clone());
        if dataset.trim().is_empty() {
            bail!("dataset must not be empty");
        }

        let search_log = file
            .search_log
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.search_log.clone());
        let port = file.port.unwrap_or(cli.port);

        let bind = file.bind.unwrap_or_else(|| cli.bind.clone());
        let bind: IpAddr = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {:?}", bind))?;

        Ok(Self {
            data_root,
            dataset,
            search_log,
            port,
            bind,
        })
    }

    /// Folder holding movies.csv and ratings.csv
    pub fn dataset_dir(&self) -> PathBuf {
        self.data_root.join(&self.dataset)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
