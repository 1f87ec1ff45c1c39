use axum::{
    http::{HeaderName, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod items;
pub mod outfits;
pub mod weather;

/// Creates the application router with all routes and middleware
///
/// Middleware layers apply bottom-up: CORS outermost, then request-id
/// stamping, request tracing, and request-id propagation onto the
/// response. CORS is permissive; the API is consumed by browser clients
/// on arbitrary origins.
pub fn create_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/items", get(items::list).post(items::create))
        .route("/items/restock", post(items::restock))
        .route("/items/:id", delete(items::remove))
        .route("/outfits", get(outfits::list))
        .route("/outfits/generate", post(outfits::generate))
        .route("/outfits/build", post(outfits::build))
        .route("/outfits/:id/use", post(outfits::use_outfit))
        .route("/weather", get(weather::current))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
