use alloy_primitives::B256;
use explorer_client::{
	models::{
		BlockId, ChainEntry, ChainRegistry, NetworkIdentity, DAO_FORK_BLOCK_HEIGHT,
		KNOWN_FORK_BLOCK_HASHES,
	},
	services::explorer::ChainIdentifier,
	utils::tests::builders::block::BlockBuilder,
};
use std::time::Duration;

use crate::integration::mocks::MockNodeProvider;

const TIMEOUT: Duration = Duration::from_millis(500);

fn provider_with_fork_block(hash: B256) -> MockNodeProvider {
	let mut provider = MockNodeProvider::new();
	provider.expect_get_block().times(1).returning(move |id| {
		assert_eq!(*id, BlockId::Number(DAO_FORK_BLOCK_HEIGHT));
		Ok(Some(
			BlockBuilder::new()
				.number(DAO_FORK_BLOCK_HEIGHT)
				.hash(hash)
				.build(),
		))
	});
	provider
}

#[tokio::test]
async fn test_known_hashes_identify_their_chain() {
	let registry = ChainRegistry::default();

	for (hash, name) in KNOWN_FORK_BLOCK_HASHES {
		let provider = provider_with_fork_block(*hash);
		let identity = ChainIdentifier::new(&provider, &registry, TIMEOUT)
			.identify()
			.await
			.unwrap();
		assert_eq!(identity, NetworkIdentity::Known(name.to_string()));
	}
}

#[tokio::test]
async fn test_unmatched_hash_is_unknown() {
	let registry = ChainRegistry::default();
	let provider = provider_with_fork_block(B256::with_last_byte(1));

	let identity = ChainIdentifier::new(&provider, &registry, TIMEOUT)
		.identify()
		.await
		.unwrap();

	assert_eq!(identity, NetworkIdentity::Unknown);
	assert!(!identity.is_known());
}

#[tokio::test]
async fn test_missing_fork_block_is_unknown() {
	let registry = ChainRegistry::default();
	let mut provider = MockNodeProvider::new();
	provider.expect_get_block().returning(|_| Ok(None));

	let identity = ChainIdentifier::new(&provider, &registry, TIMEOUT)
		.identify()
		.await
		.unwrap();

	assert_eq!(identity, NetworkIdentity::Unknown);
}

#[tokio::test]
async fn test_transport_failure_is_a_retrieval_error() {
	let registry = ChainRegistry::default();
	let mut provider = MockNodeProvider::new();
	provider
		.expect_get_block()
		.returning(|_| Err(anyhow::anyhow!("connection refused")));

	let err = ChainIdentifier::new(&provider, &registry, TIMEOUT)
		.identify()
		.await
		.unwrap_err();

	assert!(err.is_retrieval());
	assert!(err.to_string().contains("fetch fork block"));
}

#[tokio::test]
async fn test_custom_registry_uses_its_fork_height() {
	const DEVNET_HASH: B256 = B256::repeat_byte(0x11);
	let registry = ChainRegistry::new(42, vec![ChainEntry::new(DEVNET_HASH, "Devnet")]);

	let mut provider = MockNodeProvider::new();
	provider.expect_get_block().times(1).returning(|id| {
		assert_eq!(*id, BlockId::Number(42));
		Ok(Some(BlockBuilder::new().number(42).hash(DEVNET_HASH).build()))
	});

	let identity = ChainIdentifier::new(&provider, &registry, TIMEOUT)
		.identify()
		.await
		.unwrap();

	assert_eq!(identity.name(), Some("Devnet"));
}
