// handlers/expenses/create.rs - POST /expenses handler

use axum::extract::State;

use crate::api::{ExpensePayload, JsonBody};
use crate::app::AppState;
use crate::database::{Expense, ExpenseFields};
use crate::middleware::{ApiResponse, ApiResult};

/**
 * POST /expenses - Create an expense
 *
 * Input (all fields optional):
 * ```json
 * { "title": "string", "amount": 79, "note": "string", "tags": ["string"] }
 * ```
 *
 * Responds 201 with the stored expense, including the id generated by the
 * database. Any `id` in the body is ignored.
 */
pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ExpensePayload>,
) -> ApiResult<Expense> {
    let fields = ExpenseFields::from(payload);
    let id = state.expenses.insert(&fields).await?;

    Ok(ApiResponse::created(Expense::from_fields(id, fields)))
}
