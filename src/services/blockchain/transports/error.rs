//! Transport error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while talking to a node endpoint
#[derive(Debug, Error)]
pub enum TransportError {
	/// The endpoint answered with a non-success HTTP status
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: u16,
		url: String,
		body: String,
		context: Box<ErrorContext>,
	},

	/// The request never produced a response (connection refused, timeout, DNS)
	#[error("Network error: {0}")]
	Network(Box<ErrorContext>),

	/// The response body was not valid JSON
	#[error("Failed to parse JSON response: {0}")]
	ResponseParse(Box<ErrorContext>),

	/// The request could not be built
	#[error("Failed to build request: {0}")]
	RequestSerialization(Box<ErrorContext>),
}

impl TransportError {
	/// Creates an HTTP status error
	pub fn http(
		status_code: u16,
		url: impl Into<String>,
		body: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let url = url.into();
		let body = body.into();
		let message = format!("HTTP error: status {} for URL {}", status_code, &url);
		Self::Http {
			status_code,
			url,
			body,
			context: Box::new(ErrorContext::new_with_log(message, source, metadata)),
		}
	}

	/// Creates a network error
	pub fn network(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a response parse error
	pub fn response_parse(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a request serialization error
	pub fn request_serialization(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestSerialization(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Short label used for metrics
	pub fn kind(&self) -> &'static str {
		match self {
			TransportError::Http { .. } => "http",
			TransportError::Network(_) => "network",
			TransportError::ResponseParse(_) => "response_parse",
			TransportError::RequestSerialization(_) => "request_serialization",
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		match self {
			TransportError::Http { context, .. } => context.trace_id.clone(),
			TransportError::Network(context) => context.trace_id.clone(),
			TransportError::ResponseParse(context) => context.trace_id.clone(),
			TransportError::RequestSerialization(context) => context.trace_id.clone(),
		}
	}
}
