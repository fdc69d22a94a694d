use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::{middleware, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::data::data_handler;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Utility Knife endpoints.
///
/// The request timeout covers every route except `/data`: a store call that
/// has started runs to completion, so its outcome is always the one reported.
pub fn build_router(state: AppState) -> Router {
    let data = Router::new()
        .route("/data", any(data_handler))
        .route("/data/", any(data_handler))
        .route("/data/*key", any(data_handler));

    let info = Router::new()
        .route("/", any(handler::root_handler))
        .route("/json", any(handler::json_handler))
        .route("/echo", any(handler::echo_handler))
        .route("/echo/", any(handler::echo_handler))
        .route("/echo/*rest", any(handler::echo_handler))
        .fallback(handler::root_handler)
        .layer(TimeoutLayer::new(state.request_timeout));

    Router::new()
        .merge(data)
        .merge(info)
        .layer(DefaultBodyLimit::max(state.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(state.clone(), handler::identity_headers))
        .with_state(state)
}
