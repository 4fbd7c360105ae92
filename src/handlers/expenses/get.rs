// handlers/expenses/get.rs - GET /expenses/:id handler

use axum::extract::State;

use crate::api::ExpenseId;
use crate::app::AppState;
use crate::database::Expense;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /expenses/:id - Fetch a single expense. A missing row is a 404, not an error.
pub async fn get(State(state): State<AppState>, ExpenseId(id): ExpenseId) -> ApiResult<Expense> {
    match state.expenses.fetch_by_id(id).await? {
        Some(expense) => Ok(ApiResponse::ok(expense)),
        None => Err(ApiError::not_found("expenses not found")),
    }
}
