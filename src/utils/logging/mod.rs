//! Logging setup and shared error context.
//!
//! - `error`: error context carried by every error type
//! - `setup_logging`: installs the global tracing subscriber
//!
//! Environment variables:
//! - `RUST_LOG`: full filter directive, takes precedence over `LOG_LEVEL`
//! - `LOG_LEVEL`: level used when `RUST_LOG` is unset (default `info`)
//! - `LOG_FORMAT`: `pretty`, `compact` or `json` (default `compact`)

pub mod error;

use tracing_subscriber::{fmt, EnvFilter};

/// Output formats supported by [`setup_logging`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
	Pretty,
	Compact,
	Json,
}

impl LogFormat {
	/// Parses a format name, falling back to compact for unknown values
	pub fn parse(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"pretty" => LogFormat::Pretty,
			"json" => LogFormat::Json,
			_ => LogFormat::Compact,
		}
	}
}

/// Builds the filter from `RUST_LOG`, then `LOG_LEVEL`, then `info`
fn build_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
		EnvFilter::new(level)
	})
}

/// Installs the global tracing subscriber
///
/// Logs go to stderr so command output on stdout stays machine readable.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error + Send + Sync>>` - Error if a subscriber is already set
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let format = std::env::var("LOG_FORMAT")
		.map(|v| LogFormat::parse(&v))
		.unwrap_or(LogFormat::Compact);

	let builder = fmt()
		.with_env_filter(build_filter())
		.with_writer(std::io::stderr)
		.with_target(true);

	match format {
		LogFormat::Pretty => builder.pretty().try_init(),
		LogFormat::Compact => builder.compact().try_init(),
		LogFormat::Json => builder.json().try_init(),
	}
}
