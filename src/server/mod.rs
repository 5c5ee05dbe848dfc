//! HTTP surface: shared context, router, startup and shutdown.

mod routes;

use crate::library::{VideoEntry, VideoLibrary};
use crate::metadata::{MetadataResolver, Prober};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application context handed to request handlers.
#[derive(Clone)]
pub struct AppContext {
    pub library: Arc<VideoLibrary>,
    pub resolver: Arc<MetadataResolver>,
    /// Local IP shown on the gallery page. Display only, never used for
    /// binding.
    pub advertised_ip: String,
}

impl AppContext {
    pub fn new(prober: Arc<dyn Prober>, advertised_ip: String) -> Self {
        Self {
            library: Arc::new(VideoLibrary::new()),
            resolver: Arc::new(MetadataResolver::new(prober)),
            advertised_ip,
        }
    }

    /// Replace the registry contents and drop all cached metadata.
    pub fn initialize(&self, entries: Vec<VideoEntry>) {
        self.library.initialize(entries);
        self.resolver.clear();
    }

    /// Probe every registered video up front. Failures are logged and
    /// skipped; a video without cached metadata still streams.
    pub fn precache_metadata(&self) {
        let entries = self.library.entries();
        if entries.is_empty() {
            tracing::warn!("server initialized with no video files");
            return;
        }

        tracing::info!(count = entries.len(), "pre-caching video metadata");
        for (filename, result) in self.resolver.precache(&entries) {
            match result {
                Ok(()) => tracing::debug!(filename = %filename, "cached metadata"),
                Err(e) => {
                    tracing::warn!(filename = %filename, error = %e, "metadata pre-cache failed")
                }
            }
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(ctx: AppContext) -> Router {
    // Phones and media players on the LAN are different origins; range
    // headers must be allowed through for seeking.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::RANGE]);

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/stream/:filename", get(routes::stream_video))
        .route("/api/video_info/:filename", get(routes::video_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Start the HTTP server and block until shutdown.
pub async fn start_server(ctx: AppContext, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("invalid server address")?;

    let app = create_router(ctx);

    tracing::info!("starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
