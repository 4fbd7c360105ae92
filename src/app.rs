//! Router assembly and shared application state.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::database::ExpenseRepository;
use crate::error::ApiError;
use crate::handlers;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub expenses: Arc<dyn ExpenseRepository>,
}

impl AppState {
    pub fn new(expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { expenses }
    }
}

/// Build the application router with all routes and middleware
pub fn app(state: AppState, api: &ApiConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(expense_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn expense_routes() -> Router<AppState> {
    use handlers::expenses;

    Router::new()
        .route("/expenses", get(expenses::expense_list).post(expenses::expense_create))
        .route("/expenses/:id", get(expenses::expense_get).put(expenses::expense_update))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("handler panicked: {}", detail);
    ApiError::internal_server_error("internal server error").into_response()
}
