// handlers/mod.rs - HTTP handlers, one module per resource
pub mod expenses;
pub mod health;

pub use health::health;
