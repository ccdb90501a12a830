//! Client configuration loading and validation.
//!
//! Configuration is a single JSON file. Every field has a default, so an empty
//! object is a valid configuration:
//!
//! ```json
//! {
//!   "rpc_url": "http://localhost:8545",
//!   "preferred_endpoint_file": "./data/preferred_endpoint",
//!   "window_size": 10,
//!   "request_timeout_ms": 10000,
//!   "poll_interval_ms": 5000,
//!   "window_ttl_ms": 5000,
//!   "fork_block_height": 1920000,
//!   "chains": [{ "hash": "0x…", "name": "Devnet" }]
//! }
//! ```

mod error;

pub use error::ConfigError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	time::Duration,
};

use crate::models::{ChainEntry, ChainRegistry, DAO_FORK_BLOCK_HEIGHT};

const DEFAULT_WINDOW_SIZE: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
const DEFAULT_WINDOW_TTL_MS: u64 = 5_000;

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Loads and validates the configuration at `path`
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validates the configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Returns true if the path has a `.json` extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.eq_ignore_ascii_case("json"))
			.unwrap_or(false)
	}
}

/// Runtime settings of the explorer client
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerSettings {
	/// Number of blocks aggregated into statistics
	pub window_size: usize,
	/// Upper bound for every single node call
	pub request_timeout: Duration,
	/// How often the node is polled for new blocks
	pub poll_interval: Duration,
	/// How long a cached window is reused before refetching
	pub window_ttl: Duration,
	pub registry: ChainRegistry,
}

impl Default for ExplorerSettings {
	fn default() -> Self {
		Self {
			window_size: DEFAULT_WINDOW_SIZE,
			request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
			poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
			window_ttl: Duration::from_millis(DEFAULT_WINDOW_TTL_MS),
			registry: ChainRegistry::default(),
		}
	}
}

/// Client configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Explicit node endpoint, tried first
	#[serde(default)]
	pub rpc_url: Option<String>,

	/// File holding the persisted preferred endpoint, tried second
	#[serde(default)]
	pub preferred_endpoint_file: Option<PathBuf>,

	#[serde(default = "default_window_size")]
	pub window_size: usize,

	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,

	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,

	#[serde(default = "default_window_ttl_ms")]
	pub window_ttl_ms: u64,

	#[serde(default = "default_fork_block_height")]
	pub fork_block_height: u64,

	/// Registry entries added to the built-in ones
	#[serde(default)]
	pub chains: Vec<ChainEntry>,
}

fn default_window_size() -> usize {
	DEFAULT_WINDOW_SIZE
}

fn default_request_timeout_ms() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
	DEFAULT_POLL_INTERVAL_MS
}

fn default_window_ttl_ms() -> u64 {
	DEFAULT_WINDOW_TTL_MS
}

fn default_fork_block_height() -> u64 {
	DAO_FORK_BLOCK_HEIGHT
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			rpc_url: None,
			preferred_endpoint_file: None,
			window_size: DEFAULT_WINDOW_SIZE,
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
			poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
			window_ttl_ms: DEFAULT_WINDOW_TTL_MS,
			fork_block_height: DAO_FORK_BLOCK_HEIGHT,
			chains: Vec::new(),
		}
	}
}

impl ClientConfig {
	/// Builds the runtime settings
	pub fn settings(&self) -> ExplorerSettings {
		let registry = ChainRegistry {
			fork_height: self.fork_block_height,
			..ChainRegistry::default()
		}
		.with_entries(self.chains.iter().cloned());

		ExplorerSettings {
			window_size: self.window_size,
			request_timeout: Duration::from_millis(self.request_timeout_ms),
			poll_interval: Duration::from_millis(self.poll_interval_ms),
			window_ttl: Duration::from_millis(self.window_ttl_ms),
			registry,
		}
	}
}

/// Checks that a URL parses and uses http(s)
pub fn validate_rpc_url(raw: &str) -> Result<(), ConfigError> {
	let parsed = url::Url::parse(raw).map_err(|e| {
		ConfigError::validation_error(
			format!("Invalid RPC URL '{}'", raw),
			Some(Box::new(e)),
			None,
		)
	})?;
	match parsed.scheme() {
		"http" | "https" => Ok(()),
		scheme => Err(ConfigError::validation_error(
			format!("Unsupported RPC URL scheme '{}' in '{}'", scheme, raw),
			None,
			None,
		)),
	}
}

#[async_trait]
impl ConfigLoader for ClientConfig {
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let metadata = HashMap::from([("path".to_string(), path.display().to_string())]);

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"Configuration file must have a .json extension",
				None,
				Some(metadata),
			));
		}

		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				"Failed to read configuration file",
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		let config: ClientConfig = serde_json::from_str(&content).map_err(|e| {
			ConfigError::parse_error(
				"Failed to parse configuration file",
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if let Some(url) = &self.rpc_url {
			validate_rpc_url(url)?;
		}

		if self.window_size == 0 {
			return Err(ConfigError::validation_error(
				"window_size must be at least 1",
				None,
				None,
			));
		}

		for (name, value) in [
			("request_timeout_ms", self.request_timeout_ms),
			("poll_interval_ms", self.poll_interval_ms),
			("window_ttl_ms", self.window_ttl_ms),
		] {
			if value == 0 {
				return Err(ConfigError::validation_error(
					format!("{} must be greater than 0", name),
					None,
					None,
				));
			}
		}

		for (index, entry) in self.chains.iter().enumerate() {
			if entry.name.trim().is_empty() {
				return Err(ConfigError::validation_error(
					format!("Chain entry for hash '{}' has an empty name", entry.hash),
					None,
					None,
				));
			}
			if self.chains[..index].iter().any(|earlier| earlier.hash == entry.hash) {
				return Err(ConfigError::validation_error(
					format!(
						"Chain entry '{}' repeats block hash '{}'",
						entry.name, entry.hash
					),
					None,
					None,
				));
			}
		}

		Ok(())
	}
}
