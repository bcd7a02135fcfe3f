//! Interactive to-do list.
//!
//! Loads the saved list, then reads commands from stdin until `quit` or EOF.
//! Logs go to stderr so they don't interleave with the list on stdout.

use anyhow::Context;
use std::sync::Arc;
use todo::{Config, TodoAction, TodoEnvironment, TodoPersistence, TodoReducer, TodoState, shell};
use todolist_core::environment::RandomIdGenerator;
use todolist_filestore::FileKeyValueStore;
use todolist_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = FileKeyValueStore::open(&config.data_dir)
        .await
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;

    let persistence = TodoPersistence::new(Arc::new(storage), config.storage_key.clone());
    tracing::info!(
        data_dir = %config.data_dir.display(),
        key = persistence.key(),
        "Starting todo"
    );

    let env = TodoEnvironment::new(Arc::new(RandomIdGenerator), persistence);
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);

    store.send(TodoAction::Load).await?.wait().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&store, stdin, tokio::io::stdout()).await?;

    // Let the last save finish; a timeout only means that save may be lost
    if let Err(error) = store.shutdown(config.shutdown_timeout()).await {
        tracing::warn!(error = %error, "Exiting with saves still pending");
    }

    Ok(())
}
