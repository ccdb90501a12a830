use alloy_primitives::{B256, U256};
use explorer_client::{
	models::{AccountBalance, Block, BlockId, ExplorerSettings},
	services::{
		blockchain::BlockSubscription,
		explorer::{Client, ExplorerError},
	},
	utils::tests::builders::{block::BlockBuilder, transaction::TransactionBuilder},
};
use std::{
	sync::{atomic::Ordering, Arc, Mutex},
	time::Duration,
};
use tokio::sync::mpsc;

use crate::integration::mocks::{
	connected_provider, test_settings, window, MockNodeProvider, SlowStatsProvider,
};

const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

#[tokio::test]
async fn test_new_fails_for_disconnected_provider() {
	let mut provider = MockNodeProvider::new();
	provider.expect_is_connected().returning(|| false);

	let result = Client::new(provider, test_settings()).await;

	assert!(matches!(result, Err(ExplorerError::Connectivity(_))));
}

#[tokio::test]
async fn test_passthroughs_delegate_to_provider() {
	let mut provider = connected_provider();
	provider
		.expect_get_block()
		.returning(|id| match id {
			BlockId::Number(7) => Ok(Some(BlockBuilder::new().number(7).build())),
			_ => Ok(None),
		});
	provider
		.expect_get_transaction()
		.returning(|hash| {
			let hash: B256 = hash.parse()?;
			Ok(Some(TransactionBuilder::new().hash(hash).build()))
		});
	provider
		.expect_get_balance()
		.returning(|address| Ok(Some(AccountBalance::new(address, U256::from(42)))));

	let client = Client::new(provider, test_settings()).await.unwrap();

	assert!(client.is_connected().await);
	assert_eq!(
		client
			.get_block(&BlockId::Number(7))
			.await
			.unwrap()
			.unwrap()
			.number,
		7
	);
	assert!(client
		.get_block(&BlockId::Number(8))
		.await
		.unwrap()
		.is_none());
	assert_eq!(
		client.get_transaction(TX_HASH).await.unwrap().unwrap().hash(),
		TX_HASH.parse::<B256>().unwrap()
	);
	assert!(client.get_transaction("0xabc").await.unwrap_err().is_retrieval());
	assert_eq!(
		client
			.get_account_balance("0xdef")
			.await
			.unwrap()
			.unwrap()
			.balance,
		U256::from(42)
	);
}

#[tokio::test]
async fn test_fresh_cache_avoids_refetching_window() {
	let mut provider = connected_provider();
	provider.expect_get_peer_count().returning(|| Ok(1));
	provider.expect_get_gas_price().returning(|| Ok(U256::from(1)));
	let chain = window(20, 3, 15);
	provider.expect_get_block().times(3).returning(move |id| {
		let number = match id {
			BlockId::Latest => 20,
			BlockId::Number(n) => *n,
			other => panic!("unexpected block id {:?}", other),
		};
		Ok(chain.blocks().iter().find(|b| b.number == number).cloned())
	});

	let client = Client::new(provider, test_settings()).await.unwrap();

	let first = client.get_system_stats(None).await.unwrap();
	let second = client.get_system_stats(None).await.unwrap();

	assert_eq!(first.blocks, second.blocks);
	assert_eq!(
		client.cached_window().await.unwrap().as_ref(),
		&first.blocks
	);
}

#[tokio::test]
async fn test_expired_cache_is_refetched() {
	let mut provider = connected_provider();
	provider.expect_get_peer_count().returning(|| Ok(1));
	provider.expect_get_gas_price().returning(|| Ok(U256::from(1)));
	provider.expect_get_block().times(2).returning(|id| {
		let number = match id {
			BlockId::Latest => 9,
			other => panic!("unexpected block id {:?}", other),
		};
		Ok(Some(BlockBuilder::new().number(number).build()))
	});

	let settings = ExplorerSettings {
		window_size: 1,
		window_ttl: Duration::ZERO,
		..test_settings()
	};
	let client = Client::new(provider, settings).await.unwrap();

	client.get_system_stats(None).await.unwrap();
	client.get_system_stats(None).await.unwrap();
}

#[tokio::test]
async fn test_supplied_window_leaves_cache_untouched() {
	let mut provider = connected_provider();
	provider.expect_get_peer_count().returning(|| Ok(1));
	provider.expect_get_gas_price().returning(|| Ok(U256::from(1)));
	provider.expect_get_block().never();

	let client = Client::new(provider, test_settings()).await.unwrap();
	let stats = client
		.get_system_stats(Some(window(5, 3, 10)))
		.await
		.unwrap();

	assert_eq!(stats.blocks, window(5, 3, 10));
	assert!(client.cached_window().await.is_none());
}

#[tokio::test]
async fn test_update_blocks_replaces_cache() {
	let mut provider = connected_provider();
	provider.expect_get_peer_count().returning(|| Ok(1));
	provider.expect_get_gas_price().returning(|| Ok(U256::from(1)));
	provider.expect_get_block().never();

	let client = Client::new(provider, test_settings()).await.unwrap();

	let old = window(10, 3, 15);
	let new = window(11, 3, 12);
	client.update_blocks(old.clone()).await.unwrap();
	let stats = client.update_blocks(new.clone()).await.unwrap();

	assert_eq!(stats.blocks, new);
	assert_eq!(stats.block_times, vec![12, 12]);
	assert_eq!(client.cached_window().await.unwrap().as_ref(), &new);

	let cached = client.get_system_stats(None).await.unwrap();
	assert_eq!(cached.blocks, new);
}

#[tokio::test]
async fn test_in_flight_stats_see_whole_window_during_update() {
	let provider = SlowStatsProvider::new();
	let client = Arc::new(Client::new(provider.clone(), test_settings()).await.unwrap());

	let old = window(100, 3, 15);
	let new = window(103, 3, 10);
	client.update_blocks(old.clone()).await.unwrap();

	provider.hold_next_peer_count();
	let in_flight = {
		let client = client.clone();
		tokio::spawn(async move { client.get_system_stats(None).await })
	};
	provider.entered.notified().await;

	let updated = client.update_blocks(new.clone()).await.unwrap();
	provider.release.notify_one();
	let observed = in_flight.await.unwrap().unwrap();

	assert_eq!(observed.blocks, old);
	assert_eq!(observed.block_times, vec![15, 15]);
	assert_eq!(updated.blocks, new);
	assert_eq!(updated.block_times, vec![10, 10]);
	assert_eq!(client.cached_window().await.unwrap().as_ref(), &new);
	assert_eq!(provider.peer_count_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_fetch_started_before_update_does_not_replace_newer_window() {
	let provider = SlowStatsProvider::new();
	let client = Arc::new(Client::new(provider.clone(), test_settings()).await.unwrap());

	provider.hold_next_latest_block();
	let in_flight = {
		let client = client.clone();
		tokio::spawn(async move { client.get_system_stats(None).await })
	};
	provider.entered.notified().await;

	let newer = window(200, 3, 15);
	client.update_blocks(newer.clone()).await.unwrap();
	provider.release.notify_one();
	let fetched = in_flight.await.unwrap().unwrap();

	assert_eq!(fetched.blocks, window(100, 3, 15));
	assert_eq!(client.cached_window().await.unwrap().as_ref(), &newer);

	let next = client.get_system_stats(None).await.unwrap();
	assert_eq!(next.blocks.newest().unwrap().number, 200);
	assert_eq!(next.blocks, newer);
}

#[tokio::test]
async fn test_watch_new_blocks_forwards_blocks_and_errors() {
	let (sender, receiver) = mpsc::channel(8);
	let subscription = Mutex::new(Some(BlockSubscription::from_receiver(receiver)));

	let mut provider = connected_provider();
	provider.expect_watch_latest().times(1).returning(move || {
		subscription
			.lock()
			.unwrap()
			.take()
			.ok_or_else(|| anyhow::anyhow!("already subscribed"))
	});

	let client = Client::new(provider, test_settings()).await.unwrap();

	let (block_tx, mut block_rx) = mpsc::unbounded_channel::<Block>();
	let (error_tx, mut error_rx) = mpsc::unbounded_channel::<ExplorerError>();
	let handle = client
		.watch_new_blocks(
			move |block| {
				let _ = block_tx.send(block);
			},
			move |error| {
				let _ = error_tx.send(error);
			},
		)
		.await
		.unwrap();

	sender
		.send(Ok(BlockBuilder::new().number(1).build()))
		.await
		.unwrap();
	sender
		.send(Err(anyhow::anyhow!("poll failed")))
		.await
		.unwrap();
	sender
		.send(Ok(BlockBuilder::new().number(2).build()))
		.await
		.unwrap();

	assert_eq!(block_rx.recv().await.unwrap().number, 1);
	assert!(error_rx.recv().await.unwrap().is_retrieval());
	assert_eq!(block_rx.recv().await.unwrap().number, 2);

	handle.cancel();
	tokio::time::sleep(Duration::from_millis(20)).await;
	assert!(sender.is_closed());
}
