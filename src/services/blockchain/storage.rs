//! Persisted endpoint preference.
//!
//! The preferred node endpoint is stored as a plain-text file holding one URL.
//! A missing or empty file means no preference has been recorded.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Interface for storing the preferred node endpoint
#[async_trait]
pub trait EndpointStore: Send + Sync {
	/// Loads the preferred endpoint
	///
	/// # Returns
	/// * `Result<Option<String>, anyhow::Error>` - The endpoint, or None if none is stored
	async fn load(&self) -> Result<Option<String>, anyhow::Error>;

	/// Saves the preferred endpoint, replacing any previous value
	///
	/// # Arguments
	/// * `url` - Endpoint to persist
	async fn save(&self, url: &str) -> Result<(), anyhow::Error>;
}

/// File-based endpoint store
#[derive(Debug, Clone)]
pub struct FileEndpointStore {
	/// Path of the file holding the endpoint
	path: PathBuf,
}

impl FileEndpointStore {
	/// Creates a store backed by `path`
	pub fn new(path: impl Into<PathBuf>) -> Self {
		FileEndpointStore { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Default for FileEndpointStore {
	/// Uses "data/preferred_endpoint.txt"
	fn default() -> Self {
		FileEndpointStore::new(PathBuf::from("data").join("preferred_endpoint.txt"))
	}
}

#[async_trait]
impl EndpointStore for FileEndpointStore {
	async fn load(&self) -> Result<Option<String>, anyhow::Error> {
		if !self.path.exists() {
			return Ok(None);
		}

		let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
			anyhow::anyhow!(
				"Failed to read preferred endpoint from {}: {}",
				self.path.display(),
				e
			)
		})?;

		let endpoint = content.trim();
		if endpoint.is_empty() {
			return Ok(None);
		}
		Ok(Some(endpoint.to_string()))
	}

	/// # Note
	/// Creates missing parent directories
	async fn save(&self, url: &str) -> Result<(), anyhow::Error> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(|e| anyhow::anyhow!("Failed to create {}: {}", parent.display(), e))?;
		}

		tokio::fs::write(&self.path, url.trim())
			.await
			.map_err(|e| anyhow::anyhow!("Failed to save preferred endpoint: {}", e))?;
		Ok(())
	}
}
