//! Error context shared by every error type in the crate.
//!
//! Each error carries an [`ErrorContext`] holding the message, an optional source,
//! optional key/value metadata, a timestamp and a trace id that survives propagation.

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// Context attached to an error
#[derive(Debug)]
pub struct ErrorContext {
	/// Human readable message
	pub message: String,
	/// Underlying cause, if any
	pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
	/// Additional key/value pairs describing the failure
	pub metadata: Option<HashMap<String, String>>,
	/// RFC 3339 timestamp of when the context was created
	pub timestamp: String,
	/// Unique id used to correlate log lines with the error
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context
	pub fn new(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		// Reuse the trace id of a traced source so the whole chain shares one id
		let trace_id = source
			.as_deref()
			.and_then(|s| s.downcast_ref::<ErrorContext>())
			.map(|ctx| ctx.trace_id.clone())
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Creates a new error context and logs it at error level
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		context.log();
		context
	}

	/// Adds a metadata entry
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Formats the message followed by sorted metadata, if any
	pub fn format_with_metadata(&self) -> String {
		match &self.metadata {
			Some(metadata) if !metadata.is_empty() => {
				let mut pairs: Vec<_> = metadata.iter().collect();
				pairs.sort();
				let rendered = pairs
					.iter()
					.map(|(k, v)| format!("{}={}", k, v))
					.collect::<Vec<_>>()
					.join(", ");
				format!("{} [{}]", self.message, rendered)
			}
			_ => self.message.clone(),
		}
	}

	fn log(&self) {
		match &self.source {
			Some(source) => tracing::error!(
				trace_id = %self.trace_id,
				timestamp = %self.timestamp,
				source = %source,
				"{}",
				self.format_with_metadata()
			),
			None => tracing::error!(
				trace_id = %self.trace_id,
				timestamp = %self.timestamp,
				"{}",
				self.format_with_metadata()
			),
		}
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Errors that expose the trace id of their context
pub trait TraceableError: std::error::Error + Send + Sync {
	/// Returns the trace id of the error
	fn trace_id(&self) -> String;
}
