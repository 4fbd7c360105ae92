// handlers/expenses/update.rs - PUT /expenses/:id handler

use axum::extract::State;

use crate::api::{ExpenseId, ExpensePayload, JsonBody};
use crate::app::AppState;
use crate::database::{Expense, ExpenseFields};
use crate::middleware::{ApiResponse, ApiResult};

/// PUT /expenses/:id - Replace title, amount, note and tags of an expense.
///
/// The id is always taken from the path. The response is 201 with the
/// submitted fields even when no row matched the id.
pub async fn update(
    State(state): State<AppState>,
    ExpenseId(id): ExpenseId,
    JsonBody(payload): JsonBody<ExpensePayload>,
) -> ApiResult<Expense> {
    let fields = ExpenseFields::from(payload);
    state.expenses.replace_by_id(id, &fields).await?;

    Ok(ApiResponse::created(Expense::from_fields(id, fields)))
}
