//! AdaptaLyfe gateway binary.

use std::sync::Arc;

use clap::Parser;
use object_store::local::LocalFileSystem;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adaptalyfe_core::store::AppStore;
use adaptalyfe_gateway::{create_router, AppState, Args, GatewayConfig};
use adaptalyfe_objects::{ObjectVault, SidecarSigner, StaticSigner, UrlSigner, VaultConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        data = %config.data_path.display(),
        "Starting AdaptaLyfe gateway"
    );

    let store = AppStore::open(config.data_path.join("db"))?;

    let objects_root = config.objects_root();
    std::fs::create_dir_all(&objects_root)?;
    let backend = Arc::new(LocalFileSystem::new_with_prefix(&objects_root)?);

    let signer: Arc<dyn UrlSigner> = match &config.sidecar_url {
        Some(url) => Arc::new(SidecarSigner::new(url.clone())),
        None => {
            warn!("no signing sidecar configured, issuing unsigned demo urls");
            Arc::new(StaticSigner::new(format!(
                "http://{}/demo-objects",
                config.listen_addr
            )))
        }
    };

    let vault_config = VaultConfig::new(&config.private_object_dir)
        .with_public_search_paths(config.public_object_paths.clone());
    let vault = ObjectVault::new(backend, signer, vault_config);

    let state = AppState::new(store, vault, config.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
