//! Router de la aplicación
//!
//! Rutas públicas del catálogo, formulario de contacto, administración
//! protegida por JWT y ficheros estáticos de `/uploads`.

pub mod admin_vehicle_routes;
pub mod contact_routes;
pub mod vehicle_routes;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{auth::require_admin, cors::cors_layer};
use crate::services::storage_service::UPLOADS_DIR;
use crate::state::AppState;

/// Construir el router completo con sus capas
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    let uploads = ServeDir::new(config.public_dir.join(UPLOADS_DIR));

    let admin = admin_vehicle_routes::create_admin_vehicle_router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/contact", contact_routes::create_contact_router())
        .nest("/api/admin/vehicles", admin)
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins, config.is_development()))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
