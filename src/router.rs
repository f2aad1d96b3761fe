use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, get_service},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    email::{EmailRenderer, Mailer},
    routes,
    util::image_store::ImageStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub renderer: Arc<EmailRenderer>,
    pub mailer: Arc<dyn Mailer>,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let renderer = EmailRenderer::new(&config);
        let images = ImageStore::new(&config.upload_dir);
        Self {
            db,
            config: Arc::new(config),
            renderer: Arc::new(renderer),
            mailer,
            images,
        }
    }
}

pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let origin: HeaderValue = state.config.frontend_url.trim_end_matches('/').parse()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);
    let upload_dir = state.config.upload_dir.clone();

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", routes::public_routes())
        .nest("/api/admin", routes::admin_routes())
        .with_state(state)
        .nest_service("/uploads", get_service(ServeDir::new(upload_dir)))
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
