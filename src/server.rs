use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::ErrorBody;
use crate::config::Config;
use crate::recommend::Recommender;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(config: Config, recommender: Arc<Recommender>) -> Self {
        Self {
            config: Arc::new(config),
            recommender,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(crate::api::home))
        .route("/recommend", get(crate::api::recommend))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// The pipeline swallows provider failures itself; anything that still panics
// out of a handler becomes the generic error object, never a backtrace.
fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::with_details("Internal server error.", details)),
    )
        .into_response()
}
