//! Explorer error types
//!
//! Errors surfaced by the explorer core to its callers. A not-found entity is never
//! an error; it is an empty slot in the result.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Explorer error type
#[derive(Debug, Error)]
pub enum ExplorerError {
	/// The node reports it is not connected
	#[error("Node is not connected: {0}")]
	Connectivity(Box<ErrorContext>),

	/// A node call failed at the transport level
	#[error("Retrieval failed: {0}")]
	Retrieval(Box<ErrorContext>),

	/// A node call did not complete within the request timeout
	#[error("Request timed out: {0}")]
	Timeout(Box<ErrorContext>),

	/// The query cannot be resolved at all
	#[error("Invalid query: {0}")]
	InvalidQuery(Box<ErrorContext>),

	/// No connection strategy produced a connected node
	#[error("Connection failed: {0}")]
	Connection(Box<ErrorContext>),
}

impl ExplorerError {
	/// Creates a connectivity error
	pub fn connectivity_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Connectivity(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a retrieval error
	pub fn retrieval_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Retrieval(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a timeout error
	pub fn timeout_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates an invalid query error
	pub fn invalid_query(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidQuery(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Connection(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Checks if this is a connectivity error
	pub fn is_connectivity(&self) -> bool {
		matches!(self, Self::Connectivity(_))
	}

	/// Checks if this is a retrieval failure, timeouts included
	pub fn is_retrieval(&self) -> bool {
		matches!(self, Self::Retrieval(_) | Self::Timeout(_))
	}

	/// Checks if this is a timeout
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout(_))
	}

	/// Returns the context attached to the error
	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::Connectivity(context)
			| Self::Retrieval(context)
			| Self::Timeout(context)
			| Self::InvalidQuery(context)
			| Self::Connection(context) => context,
		}
	}
}

impl TraceableError for ExplorerError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
