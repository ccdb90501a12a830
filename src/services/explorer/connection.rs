//! Connection establishment.
//!
//! Strategies are tried in order. Each either yields a provider or is not
//! applicable; a provider that is not connected is skipped as well.

use std::{collections::HashMap, fmt, path::PathBuf, sync::Arc};

use crate::{
	models::{ClientConfig, ExplorerSettings},
	services::{
		blockchain::{EndpointStore, EvmNodeProvider, FileEndpointStore, NodeProvider},
		explorer::{deadline::with_timeout, error::ExplorerError},
	},
};

/// One way of obtaining a node provider
#[derive(Clone)]
pub enum ConnectionStrategy {
	/// Explicit JSON-RPC endpoint
	Endpoint(String),
	/// Endpoint stored in a preference file
	Persisted(PathBuf),
	/// Provider constructed by the caller
	Injected(Arc<dyn NodeProvider>),
}

impl fmt::Debug for ConnectionStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Endpoint(url) => f.debug_tuple("Endpoint").field(url).finish(),
			Self::Persisted(path) => f.debug_tuple("Persisted").field(path).finish(),
			Self::Injected(_) => f.write_str("Injected(..)"),
		}
	}
}

impl fmt::Display for ConnectionStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Endpoint(url) => write!(f, "endpoint {}", url),
			Self::Persisted(path) => write!(f, "persisted endpoint in {}", path.display()),
			Self::Injected(_) => write!(f, "injected provider"),
		}
	}
}

impl ConnectionStrategy {
	/// Builds the ordered strategies described by a configuration
	///
	/// An explicit endpoint comes before the persisted preference.
	pub fn from_config(config: &ClientConfig) -> Vec<Self> {
		let mut strategies = Vec::new();
		if let Some(url) = &config.rpc_url {
			strategies.push(Self::Endpoint(url.clone()));
		}
		if let Some(path) = &config.preferred_endpoint_file {
			strategies.push(Self::Persisted(path.clone()));
		}
		strategies
	}

	/// Builds the provider for this strategy
	///
	/// # Returns
	/// * `Result<Option<Arc<dyn NodeProvider>>, anyhow::Error>` - The provider, or None
	///   when the strategy does not apply
	async fn provider(
		&self,
		settings: &ExplorerSettings,
	) -> Result<Option<Arc<dyn NodeProvider>>, anyhow::Error> {
		let url = match self {
			Self::Injected(provider) => return Ok(Some(provider.clone())),
			Self::Endpoint(url) => url.clone(),
			Self::Persisted(path) => match FileEndpointStore::new(path.clone()).load().await? {
				Some(url) => url,
				None => return Ok(None),
			},
		};

		let provider: Arc<dyn NodeProvider> = Arc::new(
			EvmNodeProvider::connect_http(&url, settings.request_timeout)?
				.with_poll_interval(settings.poll_interval),
		);
		Ok(Some(provider))
	}
}

/// Returns the first connected provider produced by `strategies`
///
/// # Arguments
/// * `strategies` - Strategies in priority order
/// * `settings` - Runtime settings (request timeout, poll interval)
///
/// # Returns
/// * `Result<Arc<dyn NodeProvider>, ExplorerError>` - The provider, or a connection error
///   listing every attempt
pub async fn establish_provider(
	strategies: &[ConnectionStrategy],
	settings: &ExplorerSettings,
) -> Result<Arc<dyn NodeProvider>, ExplorerError> {
	let mut attempts = Vec::with_capacity(strategies.len());

	for strategy in strategies {
		let provider = match strategy.provider(settings).await {
			Ok(Some(provider)) => provider,
			Ok(None) => {
				tracing::debug!(strategy = %strategy, "Connection strategy not applicable");
				attempts.push(format!("{}: not applicable", strategy));
				continue;
			}
			Err(e) => {
				tracing::warn!(strategy = %strategy, error = %e, "Connection strategy failed");
				attempts.push(format!("{}: {}", strategy, e));
				continue;
			}
		};

		match with_timeout(
			"check connectivity",
			settings.request_timeout,
			provider.is_connected(),
		)
		.await
		{
			Ok(true) => {
				tracing::info!(strategy = %strategy, "Connected to node");
				return Ok(provider);
			}
			Ok(false) => {
				tracing::warn!(strategy = %strategy, "Node is not connected, trying next strategy");
				attempts.push(format!("{}: not connected", strategy));
			}
			Err(e) => {
				tracing::warn!(strategy = %strategy, error = %e, "Connectivity check timed out");
				attempts.push(format!("{}: {}", strategy, e));
			}
		}
	}

	let summary = if attempts.is_empty() {
		"no connection strategies configured".to_string()
	} else {
		attempts.join("; ")
	};

	Err(ExplorerError::connection_error(
		format!("No connected node available ({})", summary),
		None,
		Some(HashMap::from([(
			"attempts".to_string(),
			attempts.len().to_string(),
		)])),
	))
}
