//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines RPC metrics recorded by the transport and network gauges updated after
//!   every successful statistics aggregation.

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

use crate::models::{quantity, SystemStats};

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Gauge for the node's peer count.
	pub static ref NODE_PEER_COUNT: Gauge = {
		let gauge = Gauge::new("node_peer_count", "Number of peers reported by the node").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the current gas price in wei.
	pub static ref NODE_GAS_PRICE_WEI: Gauge = {
		let gauge = Gauge::new("node_gas_price_wei", "Current gas price in wei").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the height of the newest block in the last aggregated window.
	pub static ref LATEST_BLOCK_NUMBER: Gauge = {
		let gauge = Gauge::new("latest_block_number", "Height of the newest aggregated block").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the mean difficulty across the last aggregated window.
	pub static ref AVERAGE_DIFFICULTY: Gauge = {
		let gauge = Gauge::new("average_difficulty", "Mean block difficulty across the window").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the mean block time in seconds across the last aggregated window.
	pub static ref AVERAGE_BLOCK_TIME_SECONDS: Gauge = {
		let gauge = Gauge::new("average_block_time_seconds", "Mean time between blocks in seconds").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the estimated network hash rate.
	pub static ref HASH_RATE: Gauge = {
		let gauge = Gauge::new("hash_rate", "Estimated network hashes per second").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// ============================================================
	// RPC Operational Metrics
	// ============================================================

	/// Counter for total RPC requests.
	///
	/// Tracks the total number of RPC requests made, labeled by method.
	pub static ref RPC_REQUESTS_TOTAL: CounterVec = {
		let counter = CounterVec::new(
			Opts::new("rpc_requests_total", "Total number of RPC requests"),
			&["method"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter for RPC request errors.
	///
	/// Tracks the total number of failed RPC requests, labeled by method and error type.
	pub static ref RPC_REQUEST_ERRORS_TOTAL: CounterVec = {
		let counter = CounterVec::new(
			Opts::new("rpc_request_errors_total", "Total number of RPC request errors"),
			&["method", "error_type"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Histogram for RPC request duration.
	///
	/// Tracks the duration of RPC requests in seconds, labeled by method.
	pub static ref RPC_REQUEST_DURATION_SECONDS: HistogramVec = {
		let histogram = HistogramVec::new(
			HistogramOpts::new("rpc_request_duration_seconds", "RPC request duration in seconds")
				.buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
			&["method"]
		).unwrap();
		REGISTRY.register(Box::new(histogram.clone())).unwrap();
		histogram
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Updates the network gauges from freshly aggregated stats.
pub fn update_network_metrics(stats: &SystemStats) {
	NODE_PEER_COUNT.set(stats.peer_count as f64);
	NODE_GAS_PRICE_WEI.set(quantity::to_f64(stats.gas_price));
	AVERAGE_DIFFICULTY.set(stats.avg_difficulty);
	AVERAGE_BLOCK_TIME_SECONDS.set(stats.avg_block_time);
	HASH_RATE.set(stats.hash_rate);
	if let Some(newest) = stats.blocks.newest() {
		LATEST_BLOCK_NUMBER.set(newest.number as f64);
	}
}

// ============================================================
// RPC Metrics Helper Functions
// ============================================================

/// Records an RPC request.
///
/// # Arguments
/// * `method` - The RPC method name (e.g., "eth_getBlockByNumber")
pub fn record_rpc_request(method: &str) {
	RPC_REQUESTS_TOTAL.with_label_values(&[method]).inc();
}

/// Records an RPC request error.
///
/// # Arguments
/// * `method` - The RPC method name
/// * `error_type` - The type of error (e.g., "http", "network", "response_parse")
pub fn record_rpc_error(method: &str, error_type: &str) {
	RPC_REQUEST_ERRORS_TOTAL
		.with_label_values(&[method, error_type])
		.inc();
}

/// Observes the duration of an RPC request.
///
/// # Arguments
/// * `method` - The RPC method name
/// * `duration_secs` - The request duration in seconds
pub fn observe_rpc_duration(method: &str, duration_secs: f64) {
	RPC_REQUEST_DURATION_SECONDS
		.with_label_values(&[method])
		.observe(duration_secs);
}
