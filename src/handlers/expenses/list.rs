// handlers/expenses/list.rs - GET /expenses handler

use axum::extract::State;

use crate::app::AppState;
use crate::database::Expense;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /expenses - Every expense ordered by id. Unfiltered, no pagination.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Expense>> {
    let expenses = state.expenses.list_all().await?;
    Ok(ApiResponse::ok(expenses))
}
