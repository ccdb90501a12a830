use explorer_client::services::{
	blockchain::NodeProvider,
	explorer::{establish_provider, Client, ConnectionStrategy, ExplorerError},
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::mocks::{connected_provider, test_settings, MockNodeProvider};

fn injected(connected: bool) -> ConnectionStrategy {
	let mut provider = MockNodeProvider::new();
	provider.expect_is_connected().returning(move || connected);
	let provider: Arc<dyn NodeProvider> = Arc::new(provider);
	ConnectionStrategy::Injected(provider)
}

fn listening_node(server: &mut mockito::ServerGuard) -> mockito::Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "net_listening"})))
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":true}"#)
		.expect_at_least(1)
		.create()
}

#[tokio::test]
async fn test_injected_provider_is_used() {
	let provider = establish_provider(&[injected(true)], &test_settings())
		.await
		.unwrap();

	assert!(provider.is_connected().await);
}

#[tokio::test]
async fn test_disconnected_strategy_falls_through_to_next() {
	let strategies = [injected(false), injected(true)];

	let provider = establish_provider(&strategies, &test_settings())
		.await
		.unwrap();

	assert!(provider.is_connected().await);
}

#[tokio::test]
async fn test_endpoint_strategy_connects_over_http() {
	let mut server = Server::new_async().await;
	let mock = listening_node(&mut server);

	let strategies = [ConnectionStrategy::Endpoint(server.url())];
	let provider = establish_provider(&strategies, &test_settings())
		.await
		.unwrap();

	assert!(provider.is_connected().await);
	mock.assert();
}

#[tokio::test]
async fn test_persisted_endpoint_is_loaded_from_file() {
	let mut server = Server::new_async().await;
	let _mock = listening_node(&mut server);

	let dir = TempDir::new().unwrap();
	let path = dir.path().join("endpoint.txt");
	std::fs::write(&path, format!("{}\n", server.url())).unwrap();

	let strategies = [ConnectionStrategy::Persisted(path)];
	let provider = establish_provider(&strategies, &test_settings()).await;

	assert!(provider.is_ok());
}

#[tokio::test]
async fn test_missing_persisted_file_is_not_applicable() {
	let dir = TempDir::new().unwrap();
	let strategies = [
		ConnectionStrategy::Persisted(dir.path().join("absent.txt")),
		injected(true),
	];

	let provider = establish_provider(&strategies, &test_settings()).await;

	assert!(provider.is_ok());
}

#[tokio::test]
async fn test_all_strategies_failing_lists_attempts() {
	let dir = TempDir::new().unwrap();
	let strategies = [
		ConnectionStrategy::Endpoint("ftp://localhost".to_string()),
		ConnectionStrategy::Persisted(dir.path().join("absent.txt")),
		injected(false),
	];

	let error = match establish_provider(&strategies, &test_settings()).await {
		Err(error) => error,
		Ok(_) => panic!("no strategy should connect"),
	};

	assert!(matches!(error, ExplorerError::Connection(_)));
	let message = error.to_string();
	assert!(message.contains("endpoint ftp://localhost"));
	assert!(message.contains("not applicable"));
	assert!(message.contains("injected provider: not connected"));
}

#[tokio::test]
async fn test_no_strategies_is_a_connection_error() {
	let error = match establish_provider(&[], &test_settings()).await {
		Err(error) => error,
		Ok(_) => panic!("nothing to connect to"),
	};

	assert!(error
		.to_string()
		.contains("no connection strategies configured"));
}

#[tokio::test]
async fn test_client_connect_uses_first_connected_strategy() {
	let provider: Arc<dyn NodeProvider> = Arc::new(connected_provider());
	let strategies = [injected(false), ConnectionStrategy::Injected(provider)];

	let client = Client::connect(&strategies, test_settings()).await.unwrap();

	assert!(client.is_connected().await);
}
