//! Transaction and account data structures.

use alloy_primitives::{utils::format_ether, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use super::quantity::{option_u64_hex, u64_hex};

/// A transaction as reported by `eth_getTransactionByHash`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Hash of the transaction
	pub hash: B256,

	#[serde(with = "u64_hex")]
	pub nonce: u64,

	/// Hash of the including block, absent while pending
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<B256>,

	/// Height of the including block, absent while pending
	#[serde(default, with = "option_u64_hex", skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,

	#[serde(default, with = "option_u64_hex", skip_serializing_if = "Option::is_none")]
	pub transaction_index: Option<u64>,

	/// Sender address
	pub from: Address,

	/// Recipient address, absent for contract creation
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<Address>,

	/// Transferred value in wei
	pub value: U256,

	/// Gas limit supplied by the sender
	#[serde(with = "u64_hex")]
	pub gas: u64,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_price: Option<U256>,

	/// Call data
	#[serde(default)]
	pub input: Bytes,
}

impl Transaction {
	/// Get the transaction hash
	pub fn hash(&self) -> B256 {
		self.hash
	}

	/// Returns true once the transaction is included in a block
	pub fn is_mined(&self) -> bool {
		self.block_number.is_some()
	}

	/// Returns true for contract creation transactions
	pub fn is_contract_creation(&self) -> bool {
		self.to.is_none()
	}
}

/// Balance of an account at the latest block
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AccountBalance {
	/// Account address as queried
	pub address: String,

	/// Balance in wei
	pub balance: U256,
}

impl AccountBalance {
	pub fn new(address: impl Into<String>, balance: U256) -> Self {
		Self {
			address: address.into(),
			balance,
		}
	}

	/// Balance formatted in ether
	pub fn as_ether(&self) -> String {
		format_ether(self.balance)
	}
}
