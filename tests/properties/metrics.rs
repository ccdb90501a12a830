//! Property-based tests for network statistics.

use alloy_primitives::U256;
use explorer_client::{
	models::{Block, BlockWindow},
	services::explorer::{average_block_time, average_difficulty, block_times, hash_rate, summarize},
	utils::tests::builders::block::BlockBuilder,
};
use proptest::{prelude::*, test_runner::Config};

// Newest-first blocks with arbitrary timestamps and difficulties
fn arb_blocks(max: usize) -> impl Strategy<Value = Vec<Block>> {
	prop::collection::vec((any::<u64>(), any::<[u8; 32]>()), 0..=max).prop_map(|entries| {
		let count = entries.len() as u64;
		entries
			.into_iter()
			.enumerate()
			.map(|(i, (timestamp, difficulty))| {
				BlockBuilder::new()
					.number(count - i as u64)
					.timestamp(timestamp)
					.difficulty(U256::from_be_bytes(difficulty))
					.build()
			})
			.collect()
	})
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn constant_difficulty_averages_to_itself(
		difficulty in any::<u32>(),
		count in 1usize..20,
	) {
		let blocks: Vec<Block> = (0..count as u64)
			.map(|n| BlockBuilder::new().number(100 - n).difficulty(U256::from(difficulty)).build())
			.collect();

		prop_assert_eq!(average_difficulty(&blocks), difficulty as f64);
	}

	#[test]
	fn block_times_has_one_entry_per_adjacent_pair(blocks in arb_blocks(12)) {
		let times = block_times(&blocks);

		prop_assert_eq!(times.len(), blocks.len().saturating_sub(1));
		for (i, delta) in times.iter().enumerate() {
			let exact = i128::from(blocks[i].timestamp) - i128::from(blocks[i + 1].timestamp);
			prop_assert_eq!(
				i128::from(*delta),
				exact.clamp(i128::from(i64::MIN), i128::from(i64::MAX))
			);
			prop_assert_eq!(delta.signum(), exact.signum() as i64);
		}
	}

	#[test]
	fn hash_rate_is_finite_and_non_negative(blocks in arb_blocks(8)) {
		let rate = hash_rate(&blocks);

		prop_assert!(rate.is_finite());
		prop_assert!(rate >= 0.0);
	}

	#[test]
	fn summary_is_consistent_with_its_window(
		blocks in arb_blocks(10),
		peers in any::<u64>(),
		gas in any::<u64>(),
	) {
		let window = BlockWindow::new(blocks);
		let stats = summarize(peers, U256::from(gas), window.clone());

		prop_assert!(stats.connected);
		prop_assert_eq!(stats.peer_count, peers);
		prop_assert_eq!(stats.gas_price, U256::from(gas));
		prop_assert_eq!(&stats.blocks, &window);
		prop_assert_eq!(stats.block_times.len(), window.len().saturating_sub(1));
		prop_assert_eq!(stats.avg_block_time, average_block_time(&stats.block_times));
	}
}
