use alloy_primitives::U256;
use explorer_client::services::blockchain::{
	BlockchainTransport, EvmNodeProvider, HttpTransportClient, NodeProvider, TransportError,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_send_raw_request_returns_envelope() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "eth_gasPrice",
			"params": []
		})))
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x3b9aca00"}"#)
		.create();

	let transport = HttpTransportClient::new(&server.url(), TIMEOUT).unwrap();
	let response = transport
		.send_raw_request("eth_gasPrice", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], "0x3b9aca00");
	mock.assert();
}

#[tokio::test]
async fn test_request_ids_increase() {
	let mut server = Server::new_async().await;
	let first = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"id": 1})))
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":true}"#)
		.create();
	let second = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"id": 2})))
		.with_body(r#"{"jsonrpc":"2.0","id":2,"result":true}"#)
		.create();

	let transport = HttpTransportClient::new(&server.url(), TIMEOUT).unwrap();
	let shared = transport.clone();
	transport
		.send_raw_request("net_listening", Some(json!([])))
		.await
		.unwrap();
	shared
		.send_raw_request("net_listening", Some(json!([])))
		.await
		.unwrap();

	first.assert();
	second.assert();
}

#[tokio::test]
async fn test_error_status_is_http_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(503)
		.with_body("upstream unavailable")
		.create();

	let transport = HttpTransportClient::new(&server.url(), TIMEOUT).unwrap();
	let error = transport
		.send_raw_request("eth_gasPrice", Some(json!([])))
		.await
		.unwrap_err();

	match error {
		TransportError::Http {
			status_code, body, ..
		} => {
			assert_eq!(status_code, 503);
			assert_eq!(body, "upstream unavailable");
		}
		other => panic!("expected an HTTP error, got {:?}", other),
	}
	mock.assert();
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/")
		.with_body("not json")
		.create();

	let transport = HttpTransportClient::new(&server.url(), TIMEOUT).unwrap();
	let error = transport
		.send_raw_request("eth_gasPrice", Some(json!([])))
		.await
		.unwrap_err();

	assert!(matches!(error, TransportError::ResponseParse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
	let transport = HttpTransportClient::new("http://127.0.0.1:1", TIMEOUT).unwrap();
	let error = transport
		.send_raw_request("eth_gasPrice", Some(json!([])))
		.await
		.unwrap_err();

	assert!(matches!(error, TransportError::Network(_)));
}

#[tokio::test]
async fn test_get_current_url_and_invalid_urls() {
	let transport = HttpTransportClient::new("http://localhost:8545", TIMEOUT).unwrap();
	assert_eq!(transport.get_current_url().await, "http://localhost:8545");

	let error = HttpTransportClient::new("not a url", TIMEOUT).unwrap_err();
	assert!(error.to_string().contains("Invalid URL"));

	let error = HttpTransportClient::new("ws://localhost:8546", TIMEOUT).unwrap_err();
	assert!(error.to_string().contains("expected http or https"));
}

#[tokio::test]
async fn test_provider_over_http_reads_block() {
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "eth_getBlockByNumber",
			"params": ["latest", false]
		})))
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"result": {
					"number": "0x1d4c00",
					"hash": format!("0x{:064x}", 1),
					"parentHash": format!("0x{:064x}", 0),
					"timestamp": "0x55ba467c",
					"difficulty": "0x3ff800000",
					"gasUsed": "0x0",
					"gasLimit": "0x1388",
					"transactions": []
				}
			})
			.to_string(),
		)
		.create();

	let provider = EvmNodeProvider::connect_http(&server.url(), TIMEOUT).unwrap();
	let block = provider
		.get_block(&explorer_client::models::BlockId::Latest)
		.await
		.unwrap()
		.unwrap();

	assert_eq!(block.number, 1_920_000);
	assert_eq!(block.difficulty, U256::from(17_171_480_576u64));
}
