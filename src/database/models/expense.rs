use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// A persisted expense row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i32,
    pub title: String,
    pub amount: f64,
    pub note: String,
    pub tags: Vec<String>,
}

/// The mutable columns of an expense; everything except `id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFields {
    pub title: String,
    pub amount: f64,
    pub note: String,
    pub tags: Vec<String>,
}

impl Expense {
    pub fn from_fields(id: i32, fields: ExpenseFields) -> Self {
        Self {
            id,
            title: fields.title,
            amount: fields.amount,
            note: fields.note,
            tags: fields.tags,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Expense {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        // tags may be NULL for rows written outside this service
        let tags: Option<Vec<String>> = row.try_get("tags")?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            amount: row.try_get("amount")?,
            note: row.try_get("note")?,
            tags: tags.unwrap_or_default(),
        })
    }
}
