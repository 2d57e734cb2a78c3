use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Extension, Json, Router,
};
use serde_json::json;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    app_module::AppState, health::health_controller, post::post_controller::post_router,
};

/// Extra time on top of the model timeout before the whole request is abandoned.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

pub fn application_router() -> Router {
    Router::new()
        .route("/v1/health", get(health_controller::health))
        .merge(post_router())
}

pub fn app(state: AppState) -> Router {
    let request_timeout = state.config.writer.timeout + REQUEST_TIMEOUT_SLACK;

    Router::new().merge(application_router()).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(request_timeout)
            .layer(TraceLayer::new_for_http())
            .layer(Extension(state))
            .layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            )
            .into_inner(),
    )
}

async fn handle_middleware_error(error: BoxError) -> Response {
    let (status, message) = if error.is::<Elapsed>() {
        (StatusCode::GATEWAY_TIMEOUT, "request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", error),
        )
    };
    tracing::error!("{}", message);

    (status, Json(json!({ "error": message }))).into_response()
}
