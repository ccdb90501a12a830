//! HTTP transport implementation.
//!
//! Sends JSON-RPC 2.0 requests to a single node endpoint. Request ids increase
//! monotonically per client. There is no retry or endpoint rotation: a failed
//! request surfaces immediately as a [`TransportError`].

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::{Duration, Instant},
};

use crate::{
	services::blockchain::transports::{BlockchainTransport, TransportError},
	utils::metrics::{observe_rpc_duration, record_rpc_error, record_rpc_request},
};

/// JSON-RPC client for one HTTP endpoint
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Underlying HTTP client, shared between clones
	client: Client,
	/// Endpoint all requests are posted to
	url: String,
	/// Next request id
	request_id: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Creates a transport for `url`
	///
	/// # Arguments
	/// * `url` - The http(s) endpoint of the node
	/// * `timeout` - Per-request timeout applied by the HTTP client
	///
	/// # Returns
	/// * `Result<Self, TransportError>` - The transport, or an error for an invalid URL
	pub fn new(url: &str, timeout: Duration) -> Result<Self, TransportError> {
		let parsed = reqwest::Url::parse(url).map_err(|e| {
			TransportError::request_serialization(
				format!("Invalid URL: {}", url),
				Some(Box::new(e)),
				None,
			)
		})?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(TransportError::request_serialization(
				format!("Invalid URL: {} (expected http or https)", url),
				None,
				None,
			));
		}

		let client = Client::builder().timeout(timeout).build().map_err(|e| {
			TransportError::request_serialization(
				"Failed to build HTTP client",
				Some(Box::new(e)),
				None,
			)
		})?;

		Ok(Self {
			client,
			url: url.to_string(),
			request_id: Arc::new(AtomicU64::new(1)),
		})
	}

	fn next_id(&self) -> u64 {
		self.request_id.fetch_add(1, Ordering::Relaxed)
	}

	/// Builds the JSON-RPC request body
	fn build_request(&self, method: &str, params: Option<Value>) -> Value {
		let mut request = json!({
			"jsonrpc": "2.0",
			"id": self.next_id(),
			"method": method,
		});
		if let Some(params) = params {
			request["params"] = params;
		}
		request
	}

	async fn post(&self, method: &str, body: &Value) -> Result<Value, TransportError> {
		let metadata = || {
			HashMap::from([
				("url".to_string(), self.url.clone()),
				("method".to_string(), method.to_string()),
			])
		};

		let response = self
			.client
			.post(&self.url)
			.json(body)
			.send()
			.await
			.map_err(|e| {
				TransportError::network(
					format!("Failed to send request to {}", self.url),
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let status = response.status();
		let text = response.text().await.map_err(|e| {
			TransportError::network(
				"Failed to read response body",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		if !status.is_success() {
			return Err(TransportError::http(
				status.as_u16(),
				self.url.clone(),
				text,
				None,
				Some(metadata()),
			));
		}

		serde_json::from_str(&text).map_err(|e| {
			TransportError::response_parse(
				format!("Invalid JSON from {}", self.url),
				Some(Box::new(e)),
				Some(metadata()),
			)
		})
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let body = self.build_request(method, params.map(Into::into));

		record_rpc_request(method);
		let started = Instant::now();
		let result = self.post(method, &body).await;
		observe_rpc_duration(method, started.elapsed().as_secs_f64());

		if let Err(e) = &result {
			record_rpc_error(method, e.kind());
		}

		result
	}
}
