use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::models::BlockWindow;

/// Network statistics derived from one aggregation
///
/// Built fresh per call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemStats {
	/// Node reported itself connected when the stats were gathered
	pub connected: bool,
	pub peer_count: u64,
	/// Gas price in wei
	pub gas_price: U256,
	/// Window the derived metrics were computed from
	pub blocks: BlockWindow,
	/// Mean difficulty across the window
	pub avg_difficulty: f64,
	/// Seconds between each block and its predecessor, newest first
	pub block_times: Vec<i64>,
	/// Mean of `block_times`, 0 when there are none
	pub avg_block_time: f64,
	/// Estimated hashes per second, 0 when it cannot be estimated
	pub hash_rate: f64,
}
