pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Positions
        .route(
            "/api/events/{id}/positions",
            get(routes::positions::list_positions).post(routes::positions::create_position),
        )
        .route(
            "/api/events/{id}/positions/{position_id}",
            put(routes::positions::update_position),
        )
        // Bulk operations
        .route(
            "/api/events/{id}/positions/reconcile",
            post(routes::reconcile::reconcile_positions),
        )
        .route(
            "/api/events/{id}/positions/bulk-create",
            post(routes::reconcile::bulk_create),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the positions API on a pre-bound listener.
///
/// Lets the caller read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("positions API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
