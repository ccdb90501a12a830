//! Blockchain explorer command-line client.
//!
//! Connects to a node through the configured strategies (explicit endpoint, then
//! persisted preference) and prints results as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use explorer_client::{
	models::{validate_rpc_url, BlockId, ClientConfig, ConfigLoader},
	services::{
		blockchain::{EndpointStore, FileEndpointStore, NodeProvider},
		explorer::{Client, ConnectionStrategy},
	},
	utils::{logging::setup_logging, metrics::gather_metrics},
};

#[derive(Parser, Debug)]
#[command(
	name = "explorer-client",
	version,
	about = "Query an Ethereum-style node: search, blocks, transactions, balances, network stats"
)]
struct Cli {
	/// Path to a JSON configuration file
	#[arg(long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Node endpoint, tried before the persisted preference
	#[arg(long, global = true, env = "EXPLORER_RPC_URL", value_name = "URL")]
	rpc_url: Option<String>,

	/// Overrides the per-request timeout
	#[arg(long, global = true, value_name = "MS")]
	timeout_ms: Option<u64>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Resolve a query as block, account and transaction at once
	Search { query: String },
	/// Show a block by height, hash, `latest` or `earliest`
	Block { id: String },
	/// Show a transaction by hash
	Tx { hash: String },
	/// Show the balance of an account
	Balance { address: String },
	/// Identify the network the node serves
	Network,
	/// Show network statistics over the recent block window
	Stats {
		/// Also print Prometheus metrics
		#[arg(long)]
		metrics: bool,
	},
	/// Print refreshed statistics for every new block until interrupted
	Watch,
	/// Persist a preferred endpoint for later runs
	Use { url: String },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
	let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
	println!("{}", rendered);
	Ok(())
}

async fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
	let mut config = match &cli.config {
		Some(path) => ClientConfig::load_from_path(path).await?,
		None => ClientConfig::default(),
	};

	if let Some(url) = &cli.rpc_url {
		config.rpc_url = Some(url.clone());
	}
	if let Some(timeout_ms) = cli.timeout_ms {
		config.request_timeout_ms = timeout_ms;
	}
	config
		.preferred_endpoint_file
		.get_or_insert_with(|| FileEndpointStore::default().path().to_path_buf());

	config.validate()?;
	Ok(config)
}

async fn watch<P: NodeProvider>(client: &Client<P>) -> anyhow::Result<()> {
	let capacity = client.settings().window_size;
	let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

	let handle = client
		.watch_new_blocks(
			move |block| {
				let _ = sender.send(block);
			},
			|error| tracing::warn!(error = %error, "Block watch reported an error"),
		)
		.await?;

	let initial = client.get_system_stats(None).await?;
	print_json(&initial)?;
	let mut window = initial.blocks;

	loop {
		tokio::select! {
			_ = tokio::signal::ctrl_c() => {
				tracing::info!("Stopping block watch");
				break;
			}
			block = receiver.recv() => {
				let Some(block) = block else { break };
				window = window.with_newest(block, capacity);
				match client.update_blocks(window.clone()).await {
					Ok(stats) => print_json(&stats)?,
					Err(e) => tracing::warn!(error = %e, "Failed to refresh statistics"),
				}
			}
		}
	}

	handle.cancel();
	Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	setup_logging().map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

	let cli = Cli::parse();
	let config = load_config(&cli).await?;

	if let Command::Use { url } = &cli.command {
		validate_rpc_url(url)?;
		let path = config
			.preferred_endpoint_file
			.clone()
			.unwrap_or_else(|| FileEndpointStore::default().path().to_path_buf());
		FileEndpointStore::new(path.clone()).save(url).await?;
		println!("Preferred endpoint saved to {}", path.display());
		return Ok(());
	}

	let strategies = ConnectionStrategy::from_config(&config);
	let client = Client::connect(&strategies, config.settings()).await?;

	match &cli.command {
		Command::Search { query } => print_json(&client.resolve(query).await?)?,
		Command::Block { id } => print_json(&client.get_block(&BlockId::from_query(id)).await?)?,
		Command::Tx { hash } => print_json(&client.get_transaction(hash).await?)?,
		Command::Balance { address } => {
			print_json(&client.get_account_balance(address).await?)?
		}
		Command::Network => print_json(&client.identify_network().await?)?,
		Command::Stats { metrics } => {
			print_json(&client.get_system_stats(None).await?)?;
			if *metrics {
				let encoded = gather_metrics()
					.map_err(|e| anyhow::anyhow!("Failed to gather metrics: {}", e))?;
				print!("{}", String::from_utf8_lossy(&encoded));
			}
		}
		Command::Watch => watch(&client).await?,
		Command::Use { .. } => {}
	}

	Ok(())
}
