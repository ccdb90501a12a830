//! EVM node provider implementation.
//!
//! Maps the explorer's node primitives onto the Ethereum JSON-RPC API. A `null`
//! result, or an error object whose code says the parameters do not denote an
//! entity, is reported as not-found. Every other error object is a failure.

use alloy_primitives::U256;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{collections::HashMap, time::Duration};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::instrument;

use crate::{
	models::{AccountBalance, Block, BlockId, Transaction},
	services::blockchain::{
		provider::{BlockSubscription, NodeProvider},
		transports::{BlockchainTransport, HttpTransportClient, TransportError},
	},
};

use super::error::{is_not_found_error, EvmProviderError};

/// Ethereum JSON-RPC method constants
mod rpc_methods {
	pub const NET_LISTENING: &str = "net_listening";
	pub const NET_PEER_COUNT: &str = "net_peerCount";
	pub const GAS_PRICE: &str = "eth_gasPrice";
	pub const GET_BALANCE: &str = "eth_getBalance";
	pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
	pub const GET_BLOCK_BY_HASH: &str = "eth_getBlockByHash";
	pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";
}

/// Default interval between polls of the latest block
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Buffered notifications per subscription
const SUBSCRIPTION_BUFFER: usize = 16;

/// Provider for Ethereum-compatible nodes
#[derive(Clone, Debug)]
pub struct EvmNodeProvider<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	transport: T,
	/// Interval used by `watch_latest`
	poll_interval: Duration,
}

impl<T: Send + Sync + Clone> EvmNodeProvider<T> {
	/// Creates a new EVM provider with a specific transport
	pub fn new_with_transport(transport: T) -> Self {
		Self {
			transport,
			poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}

	/// Sets the interval used when polling for new blocks
	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	/// Returns the interval used when polling for new blocks
	pub fn poll_interval(&self) -> Duration {
		self.poll_interval
	}

	/// Extracts `result` from a JSON-RPC response
	///
	/// Returns `Ok(None)` for a `null` result and for not-found error codes.
	fn extract_result(
		&self,
		method: &'static str,
		response: &Value,
	) -> Result<Option<Value>, EvmProviderError> {
		if let Some(json_rpc_error) = response.get("error") {
			let rpc_code = json_rpc_error
				.get("code")
				.and_then(|c| c.as_i64())
				.unwrap_or(0);
			let rpc_message = json_rpc_error
				.get("message")
				.and_then(|m| m.as_str())
				.unwrap_or("Unknown RPC error")
				.to_string();

			if is_not_found_error(rpc_code) {
				tracing::debug!(method, code = rpc_code, message = %rpc_message, "Treating RPC error as not found");
				return Ok(None);
			}

			let message = format!(
				"EVM RPC request failed for method '{}': {} (code {})",
				method, rpc_message, rpc_code
			);
			return Err(EvmProviderError::rpc_error(
				message,
				None,
				Some(HashMap::from([("method".to_string(), method.to_string())])),
			));
		}

		let result = response.get("result").ok_or_else(|| {
			EvmProviderError::unexpected_response_structure(
				format!("Missing 'result' field in {} response", method),
				None,
				None,
			)
		})?;

		if result.is_null() {
			return Ok(None);
		}
		Ok(Some(result.clone()))
	}

	/// Decodes a `result` value into a model
	fn decode<D: DeserializeOwned>(
		&self,
		method: &'static str,
		result: Value,
	) -> Result<D, EvmProviderError> {
		serde_json::from_value(result).map_err(|e| {
			EvmProviderError::response_parse_error(
				format!("Failed to decode {} result", method),
				Some(Box::new(e)),
				None,
			)
		})
	}

	/// Decodes a hex quantity `result`
	fn decode_quantity(&self, method: &'static str, result: &Value) -> Result<U256, EvmProviderError> {
		match result {
			Value::String(s) => s
				.strip_prefix("0x")
				.filter(|digits| !digits.is_empty())
				.ok_or_else(|| format!("'{}' is not a 0x-prefixed quantity", s))
				.and_then(|digits| U256::from_str_radix(digits, 16).map_err(|e| e.to_string()))
				.map_err(|e| {
					EvmProviderError::response_parse_error(
						format!("Invalid quantity in {} result: {}", method, e),
						None,
						None,
					)
				}),
			Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
				EvmProviderError::response_parse_error(
					format!("Invalid number in {} result", method),
					None,
					None,
				)
			}),
			other => Err(EvmProviderError::unexpected_response_structure(
				format!("Expected a quantity in {} result, got {}", method, other),
				None,
				None,
			)),
		}
	}
}

impl EvmNodeProvider<HttpTransportClient> {
	/// Creates a provider talking JSON-RPC over HTTP to `url`
	///
	/// # Arguments
	/// * `url` - The node endpoint
	/// * `timeout` - Per-request timeout
	pub fn connect_http(url: &str, timeout: Duration) -> Result<Self, TransportError> {
		Ok(Self::new_with_transport(HttpTransportClient::new(
			url, timeout,
		)?))
	}
}

impl<T: BlockchainTransport> EvmNodeProvider<T> {
	/// Sends a request and extracts its result
	async fn call(
		&self,
		method: &'static str,
		params: Value,
	) -> Result<Option<Value>, anyhow::Error> {
		let response = self
			.transport
			.send_raw_request(method, Some(params))
			.await
			.with_context(|| format!("Failed to call {}", method))?;

		Ok(self.extract_result(method, &response)?)
	}

	/// Sends a request whose result must be present
	async fn call_required(&self, method: &'static str) -> Result<Value, anyhow::Error> {
		self.call(method, json!([])).await?.ok_or_else(|| {
			anyhow::anyhow!(EvmProviderError::unexpected_response_structure(
				format!("Empty result for {}", method),
				None,
				None,
			))
		})
	}
}

#[async_trait]
impl<T: BlockchainTransport + 'static> NodeProvider for EvmNodeProvider<T> {
	#[instrument(skip(self))]
	async fn is_connected(&self) -> bool {
		match self
			.transport
			.send_raw_request(rpc_methods::NET_LISTENING, Some(json!([])))
			.await
		{
			Ok(response) => {
				let well_formed = response.get("result").is_some() || response.get("error").is_some();
				if !well_formed {
					tracing::debug!(response = %response, "Malformed net_listening response");
				}
				well_formed
			}
			Err(e) => {
				tracing::debug!(error = %e, "Node is not reachable");
				false
			}
		}
	}

	#[instrument(skip(self, id), fields(id = %id))]
	async fn get_block(&self, id: &BlockId) -> Result<Option<Block>, anyhow::Error> {
		let (method, params) = match id {
			BlockId::Number(number) => (
				rpc_methods::GET_BLOCK_BY_NUMBER,
				json!([format!("{:#x}", number), false]),
			),
			BlockId::Latest => (rpc_methods::GET_BLOCK_BY_NUMBER, json!(["latest", false])),
			BlockId::Earliest => (rpc_methods::GET_BLOCK_BY_NUMBER, json!(["earliest", false])),
			BlockId::Hash(hash) => (rpc_methods::GET_BLOCK_BY_HASH, json!([hash, false])),
		};

		match self.call(method, params).await? {
			Some(result) => Ok(Some(self.decode(method, result)?)),
			None => Ok(None),
		}
	}

	#[instrument(skip(self))]
	async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, anyhow::Error> {
		let method = rpc_methods::GET_TRANSACTION_BY_HASH;
		match self.call(method, json!([hash])).await? {
			Some(result) => Ok(Some(self.decode(method, result)?)),
			None => Ok(None),
		}
	}

	#[instrument(skip(self))]
	async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, anyhow::Error> {
		let method = rpc_methods::GET_BALANCE;
		match self.call(method, json!([address, "latest"])).await? {
			Some(result) => {
				let balance = self.decode_quantity(method, &result)?;
				Ok(Some(AccountBalance::new(address, balance)))
			}
			None => Ok(None),
		}
	}

	#[instrument(skip(self))]
	async fn get_peer_count(&self) -> Result<u64, anyhow::Error> {
		let method = rpc_methods::NET_PEER_COUNT;
		let result = self.call_required(method).await?;
		let peers = self.decode_quantity(method, &result)?;
		u64::try_from(peers).map_err(|_| {
			anyhow::anyhow!(EvmProviderError::response_parse_error(
				format!("Peer count {} out of range", peers),
				None,
				None,
			))
		})
	}

	#[instrument(skip(self))]
	async fn get_gas_price(&self) -> Result<U256, anyhow::Error> {
		let method = rpc_methods::GAS_PRICE;
		let result = self.call_required(method).await?;
		Ok(self.decode_quantity(method, &result)?)
	}

	/// Polls the latest block and emits every block whose height advances
	///
	/// Poll failures are emitted as error items and polling continues.
	async fn watch_latest(&self) -> Result<BlockSubscription, anyhow::Error> {
		let provider = self.clone();
		let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);

		let task = tokio::spawn(async move {
			let mut interval = tokio::time::interval(provider.poll_interval);
			interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
			let mut last_emitted: Option<u64> = None;

			loop {
				interval.tick().await;

				let notification = match provider.get_block(&BlockId::Latest).await {
					Ok(Some(block)) if last_emitted.map_or(true, |n| block.number > n) => {
						last_emitted = Some(block.number);
						Some(Ok(block))
					}
					Ok(_) => None,
					Err(e) => {
						tracing::warn!(error = %e, "Failed to poll latest block");
						Some(Err(e))
					}
				};

				if let Some(notification) = notification {
					if sender.send(notification).await.is_err() {
						tracing::debug!("Block subscription closed, stopping poller");
						break;
					}
				}
			}
		});

		Ok(BlockSubscription::new(receiver, Some(task)))
	}
}
