//! Explorer client.
//!
//! Owns one connected node provider and the cached block window. The cache is
//! replaced wholesale behind an `Arc`, so a call that has taken a snapshot keeps
//! seeing that snapshot even if the cache is swapped meanwhile. Every replacement
//! bumps a generation counter; a fetched window is only cached if no replacement
//! happened while it was being fetched.

use std::{
	sync::Arc,
	time::{Duration, Instant},
};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::instrument;

use crate::{
	models::{
		AccountBalance, Block, BlockId, BlockWindow, ExplorerSettings, NetworkIdentity,
		SearchResult, SystemStats, Transaction,
	},
	services::{
		blockchain::NodeProvider,
		explorer::{
			connection::{establish_provider, ConnectionStrategy},
			deadline::{bounded, with_timeout},
			error::ExplorerError,
			identifier::ChainIdentifier,
			resolver::QueryResolver,
			stats::StatsAggregator,
		},
	},
};

#[derive(Debug, Clone)]
struct CachedWindow {
	window: Arc<BlockWindow>,
	stored_at: Instant,
}

impl CachedWindow {
	fn new(window: Arc<BlockWindow>) -> Self {
		Self {
			window,
			stored_at: Instant::now(),
		}
	}

	fn is_fresh(&self, ttl: Duration) -> bool {
		self.stored_at.elapsed() < ttl
	}
}

#[derive(Debug, Default)]
struct WindowCache {
	entry: Option<CachedWindow>,
	generation: u64,
}

impl WindowCache {
	fn replace(&mut self, window: Arc<BlockWindow>) {
		self.entry = Some(CachedWindow::new(window));
		self.generation += 1;
	}

	/// Replaces the entry unless it changed since `generation` was observed
	fn replace_if_unchanged(&mut self, generation: u64, window: Arc<BlockWindow>) -> bool {
		if self.generation != generation {
			return false;
		}
		self.replace(window);
		true
	}
}

/// Handle to a running block watch
///
/// Dropping the handle stops the watch.
#[derive(Debug)]
pub struct WatchHandle {
	task: JoinHandle<()>,
}

impl WatchHandle {
	/// Stops forwarding notifications
	pub fn cancel(self) {
		self.task.abort();
	}

	/// Returns true once the watch has ended
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}
}

impl Drop for WatchHandle {
	fn drop(&mut self) {
		self.task.abort();
	}
}

/// Blockchain explorer client
pub struct Client<P: NodeProvider> {
	provider: P,
	settings: ExplorerSettings,
	window_cache: RwLock<WindowCache>,
}

impl<P: NodeProvider> Client<P> {
	/// Creates a client over a provider
	///
	/// # Errors
	/// Fails with a connectivity error when the provider is not connected.
	pub async fn new(provider: P, settings: ExplorerSettings) -> Result<Self, ExplorerError> {
		let connected = with_timeout(
			"check connectivity",
			settings.request_timeout,
			provider.is_connected(),
		)
		.await?;

		if !connected {
			return Err(ExplorerError::connectivity_error(
				"Cannot create a client for a node that is not connected",
				None,
				None,
			));
		}

		Ok(Self::from_connected(provider, settings))
	}

	fn from_connected(provider: P, settings: ExplorerSettings) -> Self {
		Self {
			provider,
			settings,
			window_cache: RwLock::new(WindowCache::default()),
		}
	}

	pub fn provider(&self) -> &P {
		&self.provider
	}

	pub fn settings(&self) -> &ExplorerSettings {
		&self.settings
	}

	/// Checks whether the node is connected right now
	///
	/// A connectivity check that times out counts as not connected.
	pub async fn is_connected(&self) -> bool {
		with_timeout(
			"check connectivity",
			self.settings.request_timeout,
			self.provider.is_connected(),
		)
		.await
		.unwrap_or(false)
	}

	/// Resolves a query as block, account and transaction at once
	pub async fn resolve(&self, query: &str) -> Result<SearchResult, ExplorerError> {
		QueryResolver::new(&self.provider, self.settings.request_timeout)
			.resolve(query)
			.await
	}

	/// Names the network the node serves
	pub async fn identify_network(&self) -> Result<NetworkIdentity, ExplorerError> {
		ChainIdentifier::new(
			&self.provider,
			&self.settings.registry,
			self.settings.request_timeout,
		)
		.identify()
		.await
	}

	fn aggregator(&self) -> StatsAggregator<'_, P> {
		StatsAggregator::new(
			&self.provider,
			self.settings.window_size,
			self.settings.request_timeout,
		)
	}

	/// Gathers network statistics
	///
	/// With `existing_window` the stats are computed over that window and the cache
	/// is left alone. Without it a cached window younger than the configured TTL is
	/// reused; otherwise a fresh window is fetched and cached.
	#[instrument(skip(self, existing_window))]
	pub async fn get_system_stats(
		&self,
		existing_window: Option<BlockWindow>,
	) -> Result<SystemStats, ExplorerError> {
		if let Some(window) = existing_window {
			return self.aggregator().get_system_stats(Some(window)).await;
		}

		let (cached, generation) = {
			let cache = self.window_cache.read().await;
			let fresh = cache
				.entry
				.as_ref()
				.filter(|cached| cached.is_fresh(self.settings.window_ttl))
				.map(|cached| cached.window.clone());
			(fresh, cache.generation)
		};

		if let Some(window) = cached {
			tracing::debug!(blocks = window.len(), "Using cached block window");
			return self
				.aggregator()
				.get_system_stats(Some(window.as_ref().clone()))
				.await;
		}

		let stats = self.aggregator().get_system_stats(None).await?;
		let stored = self
			.window_cache
			.write()
			.await
			.replace_if_unchanged(generation, Arc::new(stats.blocks.clone()));
		if !stored {
			tracing::debug!("Window cache was replaced during the fetch, keeping the newer window");
		}
		Ok(stats)
	}

	/// Replaces the cached window and aggregates over it
	#[instrument(skip(self, window), fields(blocks = window.len()))]
	pub async fn update_blocks(&self, window: BlockWindow) -> Result<SystemStats, ExplorerError> {
		let window = Arc::new(window);
		self.window_cache.write().await.replace(window.clone());
		self.aggregator()
			.get_system_stats(Some(window.as_ref().clone()))
			.await
	}

	/// Returns the cached window, fresh or not
	pub async fn cached_window(&self) -> Option<Arc<BlockWindow>> {
		self.window_cache
			.read()
			.await
			.entry
			.as_ref()
			.map(|cached| cached.window.clone())
	}

	/// Fetches a single block
	pub async fn get_block(&self, id: &BlockId) -> Result<Option<Block>, ExplorerError> {
		bounded(
			"fetch block",
			self.settings.request_timeout,
			self.provider.get_block(id),
		)
		.await
	}

	/// Fetches a single transaction
	pub async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, ExplorerError> {
		bounded(
			"fetch transaction",
			self.settings.request_timeout,
			self.provider.get_transaction(hash),
		)
		.await
	}

	/// Fetches an account balance
	pub async fn get_account_balance(
		&self,
		address: &str,
	) -> Result<Option<AccountBalance>, ExplorerError> {
		bounded(
			"fetch balance",
			self.settings.request_timeout,
			self.provider.get_balance(address),
		)
		.await
	}

	/// Forwards new-block notifications to callbacks
	///
	/// # Arguments
	/// * `on_block` - Called with every new block
	/// * `on_error` - Called with every subscription error; the watch keeps running
	///
	/// # Returns
	/// * `Result<WatchHandle, ExplorerError>` - Handle that stops the watch
	pub async fn watch_new_blocks<B, E>(
		&self,
		on_block: B,
		on_error: E,
	) -> Result<WatchHandle, ExplorerError>
	where
		B: Fn(Block) + Send + 'static,
		E: Fn(ExplorerError) + Send + 'static,
	{
		let mut subscription = bounded(
			"subscribe to new blocks",
			self.settings.request_timeout,
			self.provider.watch_latest(),
		)
		.await?;

		let task = tokio::spawn(async move {
			while let Some(notification) = subscription.next().await {
				match notification {
					Ok(block) => on_block(block),
					Err(e) => on_error(ExplorerError::retrieval_error(
						"Block subscription reported an error",
						Some(e.into()),
						None,
					)),
				}
			}
			tracing::debug!("Block subscription ended");
		});

		Ok(WatchHandle { task })
	}
}

impl Client<Arc<dyn NodeProvider>> {
	/// Creates a client from the first strategy that yields a connected node
	pub async fn connect(
		strategies: &[ConnectionStrategy],
		settings: ExplorerSettings,
	) -> Result<Self, ExplorerError> {
		let provider = establish_provider(strategies, &settings).await?;
		Ok(Self::from_connected(provider, settings))
	}
}
