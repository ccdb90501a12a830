//! Property-based tests for query parsing and block windows.

use alloy_primitives::U256;
use explorer_client::{
	models::{AccountBalance, BlockId, BlockWindow},
	utils::tests::builders::block::BlockBuilder,
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn decimal_queries_are_block_numbers(number in any::<u64>()) {
		prop_assert_eq!(BlockId::from_query(&number.to_string()), BlockId::Number(number));
		prop_assert_eq!(
			BlockId::from_query(&format!("  {}  ", number)),
			BlockId::Number(number)
		);
	}

	#[test]
	fn balances_of_any_width_decode_to_their_value(bytes in any::<[u8; 32]>()) {
		let value = U256::from_be_bytes(bytes);
		let raw = serde_json::json!({
			"address": "0x407d73d8a49eeb85d32cf465507dd71d507100c1",
			"balance": format!("0x{:x}", value),
		});

		let balance: AccountBalance = serde_json::from_value(raw).unwrap();
		prop_assert_eq!(balance.balance, value);
	}

	#[test]
	fn full_length_hashes_are_never_numbers(bytes in prop::collection::vec(any::<u8>(), 32)) {
		let hash = format!(
			"0x{}",
			bytes.iter().map(|b| format!("{:02x}", b)).collect::<String>()
		);

		prop_assert_eq!(BlockId::from_query(&hash), BlockId::Hash(hash.clone()));
	}

	#[test]
	fn with_newest_keeps_window_bounded_and_ordered(
		heights in prop::collection::vec(0u64..50, 0..30),
		capacity in 1usize..10,
	) {
		let mut window = BlockWindow::default();
		for height in heights {
			window = window.with_newest(BlockBuilder::new().number(height).build(), capacity);

			prop_assert!(window.len() <= capacity);
			prop_assert!(window.windows(2).all(|pair| pair[0].number > pair[1].number));
		}
	}
}
