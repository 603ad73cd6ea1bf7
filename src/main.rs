use std::env;
use std::sync::Arc;

use poolwatch::config::Config;
use poolwatch::database::Database;
use poolwatch::logger::{self, LogTag};
use poolwatch::pools::PoolEventExtractor;
use poolwatch::rpc::RpcClient;

const CONFIG_PATH: &str = "config.json";

/// Feed transaction signatures from the command line to the extractor.
///
/// The signature source is deliberately minimal; in a deployment the
/// signatures come from whatever subscription feed the operator runs.
#[tokio::main]
async fn main() {
    logger::info(LogTag::System, "poolwatch starting up");

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("Failed to load config: {:#}", e));
            std::process::exit(1);
        }
    };

    // No extraction can be meaningfully persisted without the store
    let database = match Database::init(&config.database.path) {
        Ok(database) => {
            logger::info(
                LogTag::Database,
                &format!("Connected to database: {}", config.database.path),
            );
            Arc::new(database)
        }
        Err(e) => {
            logger::error(LogTag::Database, &format!("Database init failed: {:#}", e));
            std::process::exit(1);
        }
    };

    let rpc = match RpcClient::new(&config.rpc_url) {
        Ok(rpc) => {
            logger::info(LogTag::Rpc, &format!("Using RPC endpoint: {}", rpc.url()));
            Arc::new(rpc)
        }
        Err(e) => {
            logger::error(LogTag::Rpc, &format!("Failed to create RPC client: {}", e));
            std::process::exit(1);
        }
    };

    let extractor = PoolEventExtractor::new(rpc, database, &config.amm_program_id);

    let signatures: Vec<String> = env::args()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect();

    if signatures.is_empty() {
        logger::warning(
            LogTag::System,
            "No signatures given; usage: poolwatch <signature> [<signature> ...]",
        );
        return;
    }

    let mut persisted = 0usize;
    for signature in &signatures {
        if extractor.extract(signature).await.is_some() {
            persisted += 1;
        }
    }

    logger::info(
        LogTag::System,
        &format!(
            "Done: {} pool record(s) from {} signature(s)",
            persisted,
            signatures.len()
        ),
    );
}
