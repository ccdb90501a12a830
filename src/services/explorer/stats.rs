//! Network statistics.
//!
//! Aggregation runs in two phases: a connectivity gate, then a concurrent fetch of
//! peer count, gas price and (unless supplied) the block window. Any failure in the
//! second phase fails the whole call. Derived metrics are pure functions of the
//! newest-first window.

use alloy_primitives::U256;
use futures::future::try_join_all;
use std::time::Duration;
use tracing::instrument;

use crate::{
	models::{quantity, Block, BlockId, BlockWindow, SystemStats},
	services::{
		blockchain::NodeProvider,
		explorer::{
			deadline::{bounded, with_timeout},
			error::ExplorerError,
		},
	},
	utils::metrics::update_network_metrics,
};

/// Arithmetic mean of the difficulty across `blocks`, 0 for no blocks
pub fn average_difficulty(blocks: &[Block]) -> f64 {
	if blocks.is_empty() {
		return 0.0;
	}
	let total = blocks
		.iter()
		.fold(U256::ZERO, |acc, block| acc.saturating_add(block.difficulty));
	quantity::to_f64(total) / blocks.len() as f64
}

/// Signed seconds from `older` to `newer`, saturating at the `i64` bounds
fn time_delta(newer: u64, older: u64) -> i64 {
	let delta = i128::from(newer) - i128::from(older);
	delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Seconds between each block and its predecessor
///
/// `blocks` must be newest-first. The result has one entry less than `blocks`.
pub fn block_times(blocks: &[Block]) -> Vec<i64> {
	blocks
		.windows(2)
		.map(|pair| time_delta(pair[0].timestamp, pair[1].timestamp))
		.collect()
}

/// Mean of a block-time series, 0 for an empty series
pub fn average_block_time(times: &[i64]) -> f64 {
	if times.is_empty() {
		return 0.0;
	}
	times.iter().map(|&t| i128::from(t)).sum::<i128>() as f64 / times.len() as f64
}

/// Hashes per second estimated from the newest block
///
/// Newest difficulty divided by the newest block time. Reported as 0 when there
/// are fewer than two blocks or the block time is not positive.
pub fn hash_rate(blocks: &[Block]) -> f64 {
	match blocks {
		[newest, previous, ..] => {
			let delta = time_delta(newest.timestamp, previous.timestamp);
			if delta <= 0 {
				0.0
			} else {
				quantity::to_f64(newest.difficulty) / delta as f64
			}
		}
		_ => 0.0,
	}
}

/// Builds stats from fetched inputs
pub fn summarize(peer_count: u64, gas_price: U256, window: BlockWindow) -> SystemStats {
	let block_times = block_times(&window);
	SystemStats {
		connected: true,
		peer_count,
		gas_price,
		avg_difficulty: average_difficulty(&window),
		avg_block_time: average_block_time(&block_times),
		hash_rate: hash_rate(&window),
		block_times,
		blocks: window,
	}
}

/// Aggregates node data into [`SystemStats`]
pub struct StatsAggregator<'a, P: NodeProvider + ?Sized> {
	provider: &'a P,
	window_size: usize,
	request_timeout: Duration,
}

impl<'a, P: NodeProvider + ?Sized> StatsAggregator<'a, P> {
	pub fn new(provider: &'a P, window_size: usize, request_timeout: Duration) -> Self {
		Self {
			provider,
			window_size,
			request_timeout,
		}
	}

	/// Fails unless the node reports itself connected
	pub async fn ensure_connected(&self) -> Result<(), ExplorerError> {
		let connected = with_timeout(
			"check connectivity",
			self.request_timeout,
			self.provider.is_connected(),
		)
		.await?;

		if !connected {
			return Err(ExplorerError::connectivity_error(
				"Node reports it is not connected",
				None,
				None,
			));
		}
		Ok(())
	}

	/// Gathers statistics
	///
	/// # Arguments
	/// * `existing_window` - A window the caller already holds; fetched when None
	///
	/// # Returns
	/// * `Result<SystemStats, ExplorerError>` - Complete stats, or the first failure
	#[instrument(skip(self, existing_window), fields(window_supplied = existing_window.is_some()))]
	pub async fn get_system_stats(
		&self,
		existing_window: Option<BlockWindow>,
	) -> Result<SystemStats, ExplorerError> {
		self.ensure_connected().await?;

		let limit = self.request_timeout;
		let window = async {
			match existing_window {
				Some(window) => Ok(window),
				None => self.fetch_window().await,
			}
		};

		let (peer_count, gas_price, window) = tokio::try_join!(
			bounded("fetch peer count", limit, self.provider.get_peer_count()),
			bounded("fetch gas price", limit, self.provider.get_gas_price()),
			window,
		)?;

		let stats = summarize(peer_count, gas_price, window);
		update_network_metrics(&stats);

		tracing::debug!(
			peer_count = stats.peer_count,
			blocks = stats.blocks.len(),
			hash_rate = stats.hash_rate,
			"Aggregated network statistics"
		);
		Ok(stats)
	}

	/// Fetches the newest `window_size` blocks
	///
	/// The latest block is fetched first; its predecessors are then fetched
	/// concurrently. A missing block fails the fetch.
	#[instrument(skip(self), fields(window_size = self.window_size))]
	pub async fn fetch_window(&self) -> Result<BlockWindow, ExplorerError> {
		let provider = self.provider;
		let limit = self.request_timeout;

		let latest = bounded(
			"fetch latest block",
			limit,
			provider.get_block(&BlockId::Latest),
		)
		.await?
		.ok_or_else(|| ExplorerError::retrieval_error("Node returned no latest block", None, None))?;

		let newest = latest.number;
		let span = self.window_size.saturating_sub(1) as u64;
		let oldest = newest.saturating_sub(span);

		let older = try_join_all((oldest..newest).rev().map(|number| async move {
			let id = BlockId::Number(number);
			bounded("fetch window block", limit, provider.get_block(&id))
				.await?
				.ok_or_else(|| {
					ExplorerError::retrieval_error(
						format!("Node returned no block at height {}", number),
						None,
						None,
					)
				})
		}))
		.await?;

		let mut blocks = Vec::with_capacity(older.len() + 1);
		blocks.push(latest);
		blocks.extend(older);
		Ok(BlockWindow::new(blocks))
	}
}
