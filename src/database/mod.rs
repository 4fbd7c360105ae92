pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Expense, ExpenseFields};
pub use repository::{ExpenseRepository, PgExpenseRepository, StoreError};
