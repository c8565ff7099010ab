use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use common::config::BackendConfig;
use orders::{
    executable_utils::{initialize_executable, run_backend},
    images::DiskImageStorage,
    model::GenericError,
    storage::{InMemoryOrderStorage, MongoOrderStorage, OrderStorage},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Food order service", long_about = None)]
struct Args {
    /// Environment file to load before reading configuration
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Keep orders in process memory instead of MongoDB
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    let args = Args::parse();
    initialize_executable(args.env_file.as_deref())?;

    let config = BackendConfig::from_env()?;
    info!(
        port = config.port,
        public_base_url = %config.public_base_url,
        upload_dir = %config.upload_dir.display(),
        "Loaded configuration"
    );

    let storage: Arc<dyn OrderStorage> = if args.in_memory {
        info!("Using in-memory order storage");
        Arc::new(InMemoryOrderStorage::new())
    } else {
        Arc::new(MongoOrderStorage::from_config(&config.store).await?)
    };
    let images = Arc::new(DiskImageStorage::new(config.upload_dir.clone()).await?);

    run_backend(config, storage, images).await
}
