//! Application startup and lifecycle management.

use crate::config::{DriveCredentials, GalleryConfig};
use crate::handlers;
use crate::services::drive::{
    ContentSource, DriveClient, ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource,
    TokenSource,
};
use crate::services::providers::gemini::{load_prompt, GeminiConfig, GeminiTranscriber};
use crate::services::providers::InferenceProvider;
use crate::services::TranscriptionPipeline;
use axum::{body::Body, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, request_span};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentSource>,
    pub pipeline: TranscriptionPipeline,
    pub root_folder_id: String,
}

impl AppState {
    pub fn new(
        content: Arc<dyn ContentSource>,
        inference: Arc<dyn InferenceProvider>,
        root_folder_id: impl Into<String>,
    ) -> Self {
        Self {
            pipeline: TranscriptionPipeline::new(content.clone(), inference),
            content,
            root_folder_id: root_folder_id.into(),
        }
    }
}

/// Build the gateway router.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::list_root))
        .route("/health", get(handlers::health_check))
        .route("/file/:file_id", get(handlers::get_file))
        .route("/thumbnail/:file_id", get(handlers::get_thumbnail))
        .route("/thumbnails/:folder_id", get(handlers::list_thumbnails))
        .route("/transcribe/:file_id", get(handlers::transcribe_file))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

fn token_source(credentials: &DriveCredentials) -> Result<Arc<dyn TokenSource>, AppError> {
    match credentials {
        DriveCredentials::ServiceAccount(path) => {
            let key = ServiceAccountKey::from_file(path)
                .and_then(ServiceAccountTokenSource::new)
                .map_err(|e| {
                    tracing::error!(path = %path, "Failed to load Drive service account: {}", e);
                    AppError::ConfigError(anyhow::Error::new(e))
                })?;
            Ok(Arc::new(key))
        }
        DriveCredentials::AccessToken(token) => Ok(Arc::new(StaticTokenSource::new(token.clone()))),
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GalleryConfig) -> Result<Self, AppError> {
        let tokens = token_source(&config.drive.credentials)?;
        let content: Arc<dyn ContentSource> =
            Arc::new(DriveClient::new(config.drive.api_base.clone(), tokens));
        tracing::info!(api_base = %config.drive.api_base, "Initialized Drive client");

        let prompt = load_prompt(&config.prompt.path).map_err(|e| {
            tracing::error!(
                path = %config.prompt.path,
                "Failed to read transcription prompt: {}",
                e
            );
            AppError::ConfigError(anyhow::anyhow!(
                "Failed to read transcription prompt {}: {}",
                config.prompt.path,
                e
            ))
        })?;

        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.models.transcription_model.clone(),
            api_base: config.google.api_base.clone(),
            prompt,
        };
        let inference: Arc<dyn InferenceProvider> = Arc::new(GeminiTranscriber::new(gemini_config));
        tracing::info!(
            model = %config.models.transcription_model,
            "Initialized Gemini transcription provider"
        );

        let state = AppState::new(content, inference, config.drive.root_folder_id.clone());
        Self::with_state(&config, state).await
    }

    /// Bind the listener for an already assembled state.
    pub async fn with_state(config: &GalleryConfig, state: AppState) -> Result<Self, AppError> {
        let router = build_router(state, &config.static_dir);

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Drive gallery gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

    tracing::info!("Shutdown signal received");
}
