use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use common::config::{AllowedOrigins, BackendConfig, load_env_file};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    images::ImageStorage,
    model::GenericError,
    routes::{create_order, delete_order, health_check, list_orders, update_order},
    service::{OrderService, UPLOADS_PATH},
    storage::OrderStorage,
};

/// Room for the text fields and multipart framing on top of the image itself.
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(service: OrderService, max_image_bytes: usize) -> Self {
        Self {
            service,
            max_image_bytes,
        }
    }
}

/// Loads the env file and installs the tracing subscriber. `RUST_LOG`
/// overrides the default `info` level.
pub fn initialize_executable(env_file: Option<&Path>) -> Result<(), GenericError> {
    load_env_file(env_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()?;

    Ok(())
}

pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .map_err(|e| warn!("Ignoring invalid CORS origin {origin}: {e}"))
                        .ok()
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

/// Body limit for a write request carrying an image of at most `max_image_bytes`.
pub fn request_body_limit(max_image_bytes: usize) -> usize {
    max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES)
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(state.service.images().root());

    Router::new()
        .route(
            "/order",
            get(list_orders)
                .post(create_order)
                .put(update_order)
                .delete(delete_order),
        )
        .route("/health", get(health_check))
        .nest_service(&format!("/{UPLOADS_PATH}"), uploads)
        .layer(DefaultBodyLimit::max(request_body_limit(state.max_image_bytes)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_backend(
    config: BackendConfig,
    storage: Arc<dyn OrderStorage>,
    images: Arc<dyn ImageStorage>,
) -> Result<(), GenericError> {
    let service = OrderService::new(storage, images, config.public_base_url.clone());
    let state = AppState::new(service, config.max_image_bytes);
    let app = build_router(state, cors_layer(&config.allowed_origins));

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(
        "Order service listening on {address}, images served from {}{UPLOADS_PATH}",
        config.public_base_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Order service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
