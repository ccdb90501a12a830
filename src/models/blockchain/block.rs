//! Block data structures.
//!
//! Note: These structures follow the Ethereum JSON-RPC block object as returned by
//! `eth_getBlockByNumber` / `eth_getBlockByHash` with `hydrated = false`.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::quantity::{option_u64_hex, u64_hex};

/// A block as reported by the node
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
	/// Block height
	#[serde(with = "u64_hex")]
	pub number: u64,

	/// Hash of the block
	pub hash: B256,

	/// Hash of the parent block
	#[serde(default)]
	pub parent_hash: B256,

	/// Unix timestamp in seconds
	#[serde(with = "u64_hex")]
	pub timestamp: u64,

	/// Proof-of-work difficulty of this block
	#[serde(default)]
	pub difficulty: U256,

	/// Cumulative difficulty of the chain up to this block
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_difficulty: Option<U256>,

	/// Address of the block producer
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub miner: Option<Address>,

	#[serde(default, with = "u64_hex")]
	pub gas_used: u64,

	#[serde(default, with = "u64_hex")]
	pub gas_limit: u64,

	/// Block size in bytes
	#[serde(default, with = "option_u64_hex", skip_serializing_if = "Option::is_none")]
	pub size: Option<u64>,

	/// Hashes of the transactions included in the block
	#[serde(default)]
	pub transactions: Vec<B256>,
}

impl Block {
	/// Get the block number
	pub fn number(&self) -> u64 {
		self.number
	}

	/// Get the block hash
	pub fn hash(&self) -> B256 {
		self.hash
	}

	/// Number of transactions in the block
	pub fn transaction_count(&self) -> usize {
		self.transactions.len()
	}
}

/// Identifier used to look a block up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockId {
	/// Block height
	Number(u64),
	/// Block hash (or an unclassified identifier the node gets to judge)
	Hash(String),
	/// Most recent block
	Latest,
	/// Genesis block
	Earliest,
}

impl BlockId {
	/// Interprets a free-form query as a block identifier
	///
	/// Decimal digits and short `0x` quantities are heights, `0x` followed by 64 hex
	/// digits is a hash, `latest`/`earliest` are tags. Anything else is passed along
	/// as a hash so the node decides whether it denotes a block.
	pub fn from_query(query: &str) -> Self {
		let query = query.trim();

		if query.eq_ignore_ascii_case("latest") {
			return BlockId::Latest;
		}
		if query.eq_ignore_ascii_case("earliest") {
			return BlockId::Earliest;
		}

		if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
			if let Ok(number) = query.parse::<u64>() {
				return BlockId::Number(number);
			}
		}

		if let Some(digits) = query.strip_prefix("0x").or_else(|| query.strip_prefix("0X")) {
			let is_hex = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit());
			if is_hex && digits.len() <= 16 {
				if let Ok(number) = u64::from_str_radix(digits, 16) {
					return BlockId::Number(number);
				}
			}
		}

		BlockId::Hash(query.to_string())
	}
}

impl From<u64> for BlockId {
	fn from(number: u64) -> Self {
		BlockId::Number(number)
	}
}

impl From<&str> for BlockId {
	fn from(query: &str) -> Self {
		BlockId::from_query(query)
	}
}

impl fmt::Display for BlockId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BlockId::Number(n) => write!(f, "{}", n),
			BlockId::Hash(h) => write!(f, "{}", h),
			BlockId::Latest => write!(f, "latest"),
			BlockId::Earliest => write!(f, "earliest"),
		}
	}
}
