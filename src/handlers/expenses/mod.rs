// handlers/expenses/mod.rs - Expense resource handlers
//
// GET  /expenses      → list
// POST /expenses      → create
// GET  /expenses/:id  → get
// PUT  /expenses/:id  → update

pub mod create;
pub mod get;
pub mod list;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create as expense_create;
pub use get::get as expense_get;
pub use list::list as expense_list;
pub use update::update as expense_update;
