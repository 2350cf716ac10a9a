//! GeneAccess server binary.

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use geneaccess::adapters::http::{api_router, ChatAppState};
use geneaccess::adapters::{
    CachedModelHandle, FileSessionStorage, HtmlReportRenderer, InMemorySessionStorage,
};
use geneaccess::application::RuleAdjustedPredictor;
use geneaccess::config::{AppConfig, LogFormat, ServerConfig};
use geneaccess::ports::{ClassifierSource, SessionStateStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config.server);

    config.validate()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting GeneAccess"
    );

    let storage: Arc<dyn SessionStateStorage> = match &config.storage.state_dir {
        Some(dir) if config.storage.is_persistent() => {
            info!(dir = %dir.display(), "Using file session storage");
            Arc::new(FileSessionStorage::new(dir))
        }
        _ => {
            info!("Using in-memory session storage");
            Arc::new(InMemorySessionStorage::new())
        }
    };

    let model = Arc::new(CachedModelHandle::new(config.model.path.clone()));
    if config.model.preload {
        // A failed preload is retried on the first prediction
        if let Err(e) = model.classifier() {
            warn!(error = %e, "Model preload failed");
        }
    }

    let state = ChatAppState {
        storage,
        predictor: Arc::new(RuleAdjustedPredictor::new(model)),
        renderer: Arc::new(HtmlReportRenderer::new(config.reports.exports_dir.clone())),
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "GeneAccess listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GeneAccess stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
