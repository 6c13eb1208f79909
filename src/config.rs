//! Layered configuration for the operator binary.
//!
//! Values resolve with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults

use crate::availability::services::RetryPolicy;
use crate::task::services::{OverlapCheckPolicy, ParseOverlapPolicyError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The overlap policy is not recognised.
    #[error(transparent)]
    OverlapPolicy(#[from] ParseOverlapPolicyError),
}

/// Top-level TOML file; every field is optional so files may be partial.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    log_level: Option<String>,
    database: DatabaseFileConfig,
    worker: WorkerFileConfig,
    overlap: OverlapFileConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DatabaseFileConfig {
    url: Option<String>,
    pool_size: Option<u32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct WorkerFileConfig {
    max_attempts: Option<u32>,
    initial_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct OverlapFileConfig {
    policy: Option<String>,
}

/// Global CLI arguments shared by every subcommand.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// `PostgreSQL` connection URL.
    #[arg(long, global = true, env = "TASKBOARD_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum connections held by the pool.
    #[arg(long, global = true)]
    pub pool_size: Option<u32>,

    /// Attempts per materialisation job before giving up.
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Wait before the first materialisation retry, in milliseconds.
    #[arg(long, global = true)]
    pub initial_backoff_ms: Option<u64>,

    /// When updates re-run the overlap check (`on_change` or `always`).
    #[arg(long, global = true, env = "TASKBOARD_OVERLAP_POLICY")]
    pub overlap_policy: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "TASKBOARD_LOG")]
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskboardConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum connections held by the pool.
    pub pool_size: u32,
    /// Retry schedule for materialisation jobs.
    pub retry: RetryPolicy,
    /// When updates re-run the overlap check.
    pub overlap_policy: OverlapCheckPolicy,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for TaskboardConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/taskboard".to_owned(),
            pool_size: 5,
            retry: RetryPolicy::default(),
            overlap_policy: OverlapCheckPolicy::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl TaskboardConfig {
    /// Loads configuration by merging CLI args, env vars and a TOML file.
    ///
    /// An explicit `--config` path must exist. Without one, the default path
    /// is tried and a missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or the
    /// overlap policy is unknown.
    pub fn load(cli: &ConfigArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &ConfigArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let overlap_policy = cli
            .overlap_policy
            .as_deref()
            .or(file.overlap.policy.as_deref())
            .map(OverlapCheckPolicy::try_from)
            .transpose()?
            .unwrap_or(defaults.overlap_policy);
        let max_attempts = cli
            .max_attempts
            .or(file.worker.max_attempts)
            .unwrap_or_else(|| defaults.retry.max_attempts());
        let initial_backoff = cli
            .initial_backoff_ms
            .or(file.worker.initial_backoff_ms)
            .map_or_else(|| defaults.retry.initial_backoff(), Duration::from_millis);

        Ok(Self {
            database_url: cli
                .database_url
                .clone()
                .or_else(|| file.database.url.clone())
                .unwrap_or(defaults.database_url),
            pool_size: cli
                .pool_size
                .or(file.database.pool_size)
                .unwrap_or(defaults.pool_size),
            retry: RetryPolicy::new(max_attempts, initial_backoff),
            overlap_policy,
            log_level: cli
                .log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or(defaults.log_level),
        })
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let default_path = config_dir.join("taskboard").join("config.toml");
    match std::fs::read_to_string(&default_path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile {
            path: default_path,
            source,
        }),
    }
}
