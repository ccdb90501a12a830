use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AccountBalance, Block, Transaction};

/// The three interpretations attempted for a query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
	Block,
	Account,
	Transaction,
}

impl fmt::Display for LookupKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LookupKind::Block => write!(f, "block"),
			LookupKind::Account => write!(f, "account"),
			LookupKind::Transaction => write!(f, "transaction"),
		}
	}
}

/// Outcome of resolving a query
///
/// Each slot is filled independently; an empty slot means that interpretation
/// did not match (or, when listed in `failed_lookups`, could not be checked).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
	/// The query as resolved (trimmed)
	pub query: String,
	pub block: Option<Block>,
	pub account: Option<AccountBalance>,
	pub transaction: Option<Transaction>,
	/// Lookups that failed at the transport level while others completed
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub failed_lookups: Vec<LookupKind>,
}

impl SearchResult {
	/// Creates an empty result for a query
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			..Default::default()
		}
	}

	/// Returns true when no interpretation matched
	pub fn is_empty(&self) -> bool {
		self.block.is_none() && self.account.is_none() && self.transaction.is_none()
	}

	/// Lists the interpretations that matched
	pub fn matched(&self) -> Vec<LookupKind> {
		let mut kinds = Vec::new();
		if self.block.is_some() {
			kinds.push(LookupKind::Block);
		}
		if self.account.is_some() {
			kinds.push(LookupKind::Account);
		}
		if self.transaction.is_some() {
			kinds.push(LookupKind::Transaction);
		}
		kinds
	}
}
