//! Wire format for the expense resource: request binding and payload shapes.
//! Outbound expenses serialize directly from `database::models::Expense`.

pub mod extract;
pub mod payload;

pub use extract::{decode_body, BindError, ExpenseId, JsonBody};
pub use payload::ExpensePayload;
