//! Query resolution.
//!
//! A query is tried as a block id, an account address and a transaction hash at
//! the same time. Each interpretation succeeds, misses or fails on its own.

use std::time::Duration;
use tracing::instrument;

use crate::{
	models::{BlockId, LookupKind, SearchResult},
	services::{
		blockchain::NodeProvider,
		explorer::{deadline::bounded, error::ExplorerError},
	},
};

/// Resolves free-form queries against a node
pub struct QueryResolver<'a, P: NodeProvider + ?Sized> {
	provider: &'a P,
	request_timeout: Duration,
}

impl<'a, P: NodeProvider + ?Sized> QueryResolver<'a, P> {
	pub fn new(provider: &'a P, request_timeout: Duration) -> Self {
		Self {
			provider,
			request_timeout,
		}
	}

	/// Resolves a query into every interpretation the node confirms
	///
	/// # Arguments
	/// * `query` - Block height or hash, account address, or transaction hash
	///
	/// # Returns
	/// * `Result<SearchResult, ExplorerError>` - The populated slots. Fails only for an
	///   empty query or when all three lookups fail; the first failure is returned.
	#[instrument(skip(self))]
	pub async fn resolve(&self, query: &str) -> Result<SearchResult, ExplorerError> {
		let query = query.trim();
		if query.is_empty() {
			return Err(ExplorerError::invalid_query(
				"Query must not be empty",
				None,
				None,
			));
		}

		let block_id = BlockId::from_query(query);
		let limit = self.request_timeout;

		let (block, account, transaction) = tokio::join!(
			bounded("fetch block", limit, self.provider.get_block(&block_id)),
			bounded("fetch balance", limit, self.provider.get_balance(query)),
			bounded(
				"fetch transaction",
				limit,
				self.provider.get_transaction(query)
			),
		);

		let (block, account, transaction) = match (block, account, transaction) {
			(Err(first), Err(account_error), Err(transaction_error)) => {
				tracing::warn!(error = %account_error, "Balance lookup failed");
				tracing::warn!(error = %transaction_error, "Transaction lookup failed");
				return Err(first);
			}
			lookups => lookups,
		};

		let mut result = SearchResult::new(query);
		let mut failures = Vec::new();

		match block {
			Ok(found) => result.block = found,
			Err(e) => failures.push((LookupKind::Block, e)),
		}
		match account {
			Ok(found) => result.account = found,
			Err(e) => failures.push((LookupKind::Account, e)),
		}
		match transaction {
			Ok(found) => result.transaction = found,
			Err(e) => failures.push((LookupKind::Transaction, e)),
		}

		for (kind, error) in failures {
			tracing::warn!(query, lookup = %kind, error = %error, "Lookup failed, continuing with the others");
			result.failed_lookups.push(kind);
		}

		tracing::debug!(query, matched = ?result.matched(), "Resolved query");
		Ok(result)
	}
}
