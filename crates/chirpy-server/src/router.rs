use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::metrics;
use crate::state::AppState;

/// Build the axum router with all Chirpy endpoints.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/healthz", get(handler::health_handler))
        .route(
            "/api/chirps",
            get(handler::list_chirps_handler).post(handler::create_chirp_handler),
        )
        .route("/api/chirps/:chirp_id", get(handler::get_chirp_handler))
        .route(
            "/api/users",
            post(handler::register_handler).put(handler::update_user_handler),
        )
        .route("/api/login", post(handler::login_handler))
        .layer(from_fn_with_state(state.clone(), metrics::count_hits));

    let admin = Router::new()
        .route("/admin/metrics", get(metrics::metrics_handler))
        .route("/admin/reset", post(metrics::reset_handler));

    api.merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
