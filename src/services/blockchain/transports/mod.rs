//! Network transports for talking to a node.
//!
//! - `BlockchainTransport`: raw JSON-RPC request interface
//! - `HttpTransportClient`: JSON-RPC 2.0 over HTTP POST

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransportClient;

use serde::Serialize;
use serde_json::Value;

/// Raw JSON-RPC access to a node
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync + Clone {
	/// Gets the endpoint URL requests are sent to
	async fn get_current_url(&self) -> String;

	/// Sends a JSON-RPC request and returns the full response envelope
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method to call
	/// * `params` - Optional positional parameters
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The response object (with `result` or `error`)
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;
}
