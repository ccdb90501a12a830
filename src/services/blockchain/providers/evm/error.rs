//! EVM provider error types
//!
//! Provides error handling for Ethereum JSON-RPC error objects and for responses
//! that cannot be mapped onto the explorer's models.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// EVM provider error type
#[derive(Debug, Error)]
pub enum EvmProviderError {
	/// The node answered with a JSON-RPC error object
	#[error("EVM RPC request failed: {0}")]
	RpcError(Box<ErrorContext>),

	/// The `result` could not be decoded into the expected model
	#[error("Failed to parse EVM RPC response: {0}")]
	ResponseParseError(Box<ErrorContext>),

	/// The response is not a JSON-RPC response object
	#[error("Unexpected response structure from EVM RPC: {0}")]
	UnexpectedResponseStructure(Box<ErrorContext>),
}

impl EvmProviderError {
	/// Creates an RPC error
	pub fn rpc_error(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RpcError(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}

	/// Creates a response parse error
	pub fn response_parse_error(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParseError(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}

	/// Creates an unexpected response structure error
	pub fn unexpected_response_structure(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UnexpectedResponseStructure(Box::new(ErrorContext::new_with_log(
			msg, source, metadata,
		)))
	}
}

impl TraceableError for EvmProviderError {
	fn trace_id(&self) -> String {
		match self {
			EvmProviderError::RpcError(context) => context.trace_id.clone(),
			EvmProviderError::ResponseParseError(context) => context.trace_id.clone(),
			EvmProviderError::UnexpectedResponseStructure(context) => context.trace_id.clone(),
		}
	}
}

/// Known Ethereum JSON-RPC error codes
pub mod error_codes {
	/// Method does not exist on this node
	#[allow(dead_code)]
	pub const METHOD_NOT_FOUND: i64 = -32601;
	/// Invalid parameters, e.g. a malformed hash or address
	pub const INVALID_PARAMS: i64 = -32602;
	/// Internal error
	#[allow(dead_code)]
	pub const INTERNAL_ERROR: i64 = -32603;
	/// Requested resource not found (EIP-1474)
	pub const RESOURCE_NOT_FOUND: i64 = -32001;
}

/// Checks if the given RPC error code means the query does not denote the entity
pub fn is_not_found_error(code: i64) -> bool {
	matches!(
		code,
		error_codes::INVALID_PARAMS | error_codes::RESOURCE_NOT_FOUND
	)
}
