//! Network identification.
//!
//! A generic node does not report which fork it follows, so the network is named
//! by matching the hash of the block at the fork height against a registry.

use std::time::Duration;
use tracing::instrument;

use crate::{
	models::{BlockId, ChainRegistry, NetworkIdentity},
	services::{
		blockchain::NodeProvider,
		explorer::{deadline::bounded, error::ExplorerError},
	},
};

/// Names the network a node serves
pub struct ChainIdentifier<'a, P: NodeProvider + ?Sized> {
	provider: &'a P,
	registry: &'a ChainRegistry,
	request_timeout: Duration,
}

impl<'a, P: NodeProvider + ?Sized> ChainIdentifier<'a, P> {
	pub fn new(provider: &'a P, registry: &'a ChainRegistry, request_timeout: Duration) -> Self {
		Self {
			provider,
			registry,
			request_timeout,
		}
	}

	/// Identifies the network
	///
	/// # Returns
	/// * `Result<NetworkIdentity, ExplorerError>` - The registry name for the fork block hash,
	///   or `Unknown`. Errors only when the fork block cannot be retrieved.
	#[instrument(skip(self), fields(fork_height = self.registry.fork_height))]
	pub async fn identify(&self) -> Result<NetworkIdentity, ExplorerError> {
		let id = BlockId::Number(self.registry.fork_height);
		let block = bounded(
			"fetch fork block",
			self.request_timeout,
			self.provider.get_block(&id),
		)
		.await?;

		let Some(block) = block else {
			tracing::debug!("Node has no block at the fork height");
			return Ok(NetworkIdentity::Unknown);
		};

		let identity = self.registry.identify(&block.hash);
		tracing::debug!(hash = %block.hash, identity = %identity, "Matched fork block");
		Ok(identity)
	}
}
