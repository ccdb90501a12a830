//! Node provider interface.
//!
//! A `NodeProvider` supplies the raw primitives the explorer core is built on.
//! Implementations report a missing entity as `Ok(None)` and reserve `Err` for
//! failures to ask the node at all.

use alloy_primitives::U256;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::models::{AccountBalance, Block, BlockId, Transaction};

/// Raw node access used by the explorer core
#[async_trait]
pub trait NodeProvider: Send + Sync {
	/// Checks whether the node is reachable and serving requests
	async fn is_connected(&self) -> bool;

	/// Retrieves a block by height, hash or tag
	///
	/// # Arguments
	/// * `id` - Identifier of the block
	///
	/// # Returns
	/// * `Result<Option<Block>, anyhow::Error>` - The block, or None if the node has no such block
	async fn get_block(&self, id: &BlockId) -> Result<Option<Block>, anyhow::Error>;

	/// Retrieves a transaction by hash
	///
	/// # Arguments
	/// * `hash` - Transaction hash
	///
	/// # Returns
	/// * `Result<Option<Transaction>, anyhow::Error>` - The transaction, or None if unknown
	async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, anyhow::Error>;

	/// Retrieves the balance of an account at the latest block
	///
	/// # Arguments
	/// * `address` - Account address
	///
	/// # Returns
	/// * `Result<Option<AccountBalance>, anyhow::Error>` - The balance, or None if the
	///   query does not denote an account
	async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, anyhow::Error>;

	/// Number of peers the node is connected to
	async fn get_peer_count(&self) -> Result<u64, anyhow::Error>;

	/// Current gas price in wei
	async fn get_gas_price(&self) -> Result<U256, anyhow::Error>;

	/// Subscribes to new blocks
	///
	/// # Returns
	/// * `Result<BlockSubscription, anyhow::Error>` - Stream of new blocks and errors
	async fn watch_latest(&self) -> Result<BlockSubscription, anyhow::Error>;
}

#[async_trait]
impl<P: NodeProvider + ?Sized> NodeProvider for Arc<P> {
	async fn is_connected(&self) -> bool {
		(**self).is_connected().await
	}

	async fn get_block(&self, id: &BlockId) -> Result<Option<Block>, anyhow::Error> {
		(**self).get_block(id).await
	}

	async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, anyhow::Error> {
		(**self).get_transaction(hash).await
	}

	async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, anyhow::Error> {
		(**self).get_balance(address).await
	}

	async fn get_peer_count(&self) -> Result<u64, anyhow::Error> {
		(**self).get_peer_count().await
	}

	async fn get_gas_price(&self) -> Result<U256, anyhow::Error> {
		(**self).get_gas_price().await
	}

	async fn watch_latest(&self) -> Result<BlockSubscription, anyhow::Error> {
		(**self).watch_latest().await
	}
}

/// Item delivered by a block subscription
pub type BlockNotification = Result<Block, anyhow::Error>;

/// Live subscription to new blocks
///
/// Dropping the subscription (or calling [`BlockSubscription::cancel`]) stops the
/// background task feeding it.
#[derive(Debug)]
pub struct BlockSubscription {
	receiver: mpsc::Receiver<BlockNotification>,
	task: Option<JoinHandle<()>>,
}

impl BlockSubscription {
	/// Creates a subscription fed by `task` through `receiver`
	pub fn new(receiver: mpsc::Receiver<BlockNotification>, task: Option<JoinHandle<()>>) -> Self {
		Self { receiver, task }
	}

	/// Creates a subscription with no background task, fed directly by a sender
	pub fn from_receiver(receiver: mpsc::Receiver<BlockNotification>) -> Self {
		Self::new(receiver, None)
	}

	/// Waits for the next notification
	///
	/// Returns None once the subscription is cancelled or its feed has ended.
	pub async fn next(&mut self) -> Option<BlockNotification> {
		self.receiver.recv().await
	}

	/// Stops the subscription
	pub fn cancel(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
		self.receiver.close();
	}
}

impl Drop for BlockSubscription {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}
