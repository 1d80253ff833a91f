//! Command-line interface parsing for the heroes browser
//!
//! Handles parsing of CLI arguments using clap and turns them into the
//! [`Settings`] used to build the cache store and the client.

use std::path::PathBuf;

use chrono::Duration;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::{default_cache_path, CacheBackend, CacheConfig};
use crate::data::client::{API_BASE, DEFAULT_ID_RANGE, FALLBACK_URL};
use crate::data::image::IMAGE_BASE;
use crate::data::Endpoints;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache backend name is not recognized
    #[error("Invalid cache backend: '{0}'. Valid backends: file, memory")]
    InvalidBackend(String),

    /// The id range is empty
    #[error("Invalid id range: {from}..={to}")]
    InvalidRange { from: u32, to: u32 },

    /// No hero exists for the requested id
    #[error("Hero '{0}' not found")]
    NotFound(String),
}

/// Heroes - browse superhero data with a local cache
#[derive(Parser, Debug)]
#[command(name = "heroes")]
#[command(about = "Browse superhero data from superheroapi.com with a local cache")]
#[command(version)]
pub struct Cli {
    /// API token for superheroapi.com; without one the public fallback dataset is used
    #[arg(long, env = "SUPERHERO_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Cache backend: file or memory
    #[arg(long, env = "SUPERHERO_CACHE_BACKEND", default_value = "file")]
    pub cache_backend: String,

    /// Namespace for keys in the memory cache
    #[arg(long, env = "SUPERHERO_CACHE_PREFIX", default_value = "superhero_api")]
    pub cache_prefix: String,

    /// Lifetime of memory cache entries in seconds (0 keeps them forever)
    #[arg(long, env = "SUPERHERO_CACHE_TIMEOUT", default_value_t = 86_400)]
    pub cache_ttl_secs: u64,

    /// Capacity of the memory cache
    #[arg(long, default_value_t = 10_000)]
    pub cache_max_entries: usize,

    /// Location of the file cache
    #[arg(long, env = "SUPERHERO_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    /// Base URL of the token-gated API
    #[arg(long, default_value = API_BASE)]
    pub api_base: String,

    /// URL of the fallback dataset
    #[arg(long, default_value = FALLBACK_URL)]
    pub fallback_url: String,

    /// Base URL for hero images
    #[arg(long, default_value = IMAGE_BASE)]
    pub image_base: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List heroes
    List {
        /// First id to look up (token mode only)
        #[arg(long, default_value_t = *DEFAULT_ID_RANGE.start())]
        from: u32,
        /// Last id to look up (token mode only)
        #[arg(long, default_value_t = *DEFAULT_ID_RANGE.end())]
        to: u32,
    },
    /// Show one hero's appearance, biography and powerstats
    Show {
        /// Hero id
        id: String,
    },
    /// Print the image URL for a hero
    ImageUrl {
        /// Hero id
        id: String,
        /// Hero display name
        name: String,
    },
    /// Remove every cached entry
    ClearCache,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Settings {
    /// Token for the primary API, absent in anonymous mode
    pub token: Option<String>,
    /// Cache store settings
    pub cache: CacheConfig,
    /// Upstream locations
    pub endpoints: Endpoints,
}

/// Parses a cache backend argument.
pub fn parse_backend_arg(s: &str) -> Result<CacheBackend, CliError> {
    CacheBackend::from_str(s).ok_or_else(|| CliError::InvalidBackend(s.to_string()))
}

impl Settings {
    /// Creates Settings from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Settings)` with the selected backend and endpoints
    /// * `Err(CliError)` if the backend name or id range is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let backend = parse_backend_arg(&cli.cache_backend)?;

        if let Command::List { from, to } = cli.command {
            if from > to {
                return Err(CliError::InvalidRange { from, to });
            }
        }

        // Out-of-range lifetimes behave like "never expire"
        let ttl = match cli.cache_ttl_secs {
            0 => None,
            secs => Duration::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX)),
        };

        let token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Settings {
            token,
            cache: CacheConfig {
                backend,
                prefix: cli.cache_prefix.clone(),
                ttl,
                max_entries: cli.cache_max_entries,
                path: cli.cache_path.clone().unwrap_or_else(default_cache_path),
            },
            endpoints: Endpoints {
                api_base: cli.api_base.clone(),
                fallback_url: cli.fallback_url.clone(),
                image_base: cli.image_base.clone(),
            },
        })
    }
}
