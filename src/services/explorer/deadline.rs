//! Time-bounded node calls.
//!
//! Every node call issued by the explorer core goes through one of these helpers so
//! that a call which never resolves cannot stall a fan-out.

use std::{collections::HashMap, future::Future, time::Duration};

use crate::services::explorer::error::ExplorerError;

fn metadata(operation: &str, limit: Duration) -> HashMap<String, String> {
	HashMap::from([
		("operation".to_string(), operation.to_string()),
		("timeout_ms".to_string(), limit.as_millis().to_string()),
	])
}

/// Runs `future` with a deadline
///
/// # Returns
/// * `Result<T, ExplorerError>` - The output, or a timeout error once `limit` elapses
pub async fn with_timeout<F, T>(operation: &str, limit: Duration, future: F) -> Result<T, ExplorerError>
where
	F: Future<Output = T>,
{
	tokio::time::timeout(limit, future).await.map_err(|e| {
		ExplorerError::timeout_error(
			format!("{} did not complete within {}ms", operation, limit.as_millis()),
			Some(Box::new(e)),
			Some(metadata(operation, limit)),
		)
	})
}

/// Runs a fallible node call with a deadline
///
/// Transport failures become retrieval errors carrying the original error as source.
pub async fn bounded<F, T>(operation: &str, limit: Duration, future: F) -> Result<T, ExplorerError>
where
	F: Future<Output = Result<T, anyhow::Error>>,
{
	with_timeout(operation, limit, future).await?.map_err(|e| {
		ExplorerError::retrieval_error(
			format!("Failed to {}", operation),
			Some(e.into()),
			Some(metadata(operation, limit)),
		)
	})
}
