use async_trait::async_trait;
use sqlx::{Executor, FromRow, PgPool, Statement};
use std::fmt;
use tracing::debug;

use crate::database::models::{Expense, ExpenseFields};
use crate::types::{Operation, Stage};

const SELECT_BY_ID: &str = "SELECT id, title, amount, note, tags FROM expenses WHERE id = $1";
const SELECT_ALL: &str = "SELECT id, title, amount, note, tags FROM expenses ORDER BY id";
const UPDATE_BY_ID: &str =
    "UPDATE expenses SET title = $2, amount = $3, note = $4, tags = $5 WHERE id = $1";
const INSERT: &str =
    "INSERT INTO expenses (title, amount, note, tags) VALUES ($1, $2, $3, $4) RETURNING id";

/// A statement that failed, tagged with the operation and the stage it failed in
#[derive(Debug)]
pub struct StoreError {
    pub operation: Operation,
    pub stage: Stage,
    pub source: sqlx::Error,
}

impl StoreError {
    pub fn new(operation: Operation, stage: Stage, source: sqlx::Error) -> Self {
        Self { operation, stage, source }
    }

    /// Classify an error returned while running a statement: decode problems
    /// belong to the scan stage, anything else to exec.
    pub fn from_exec(operation: Operation, source: sqlx::Error) -> Self {
        let stage = match &source {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. } => Stage::Scan,
            _ => Stage::Exec,
        };
        Self::new(operation, stage, source)
    }

    /// Human readable description of the failing stage
    pub fn describe(&self) -> String {
        match self.stage {
            Stage::Prepare => format!("can't prepare {} expenses statement", self.operation),
            Stage::Exec => format!("can't execute {} expenses statement", self.operation),
            Stage::Scan => "can't scan expenses".to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.describe(), self.source)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Persistence gateway for expenses. `Ok(None)` from `fetch_by_id` means the
/// row does not exist and is never reported as an error.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Expense>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Expense>, StoreError>;

    /// Full replace of the mutable columns. Returns the number of rows
    /// touched; zero is not an error.
    async fn replace_by_id(&self, id: i32, fields: &ExpenseFields) -> Result<u64, StoreError>;

    /// Insert a row and return the id assigned by the store
    async fn insert(&self, fields: &ExpenseFields) -> Result<i32, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// PostgreSQL implementation over the shared pool
#[derive(Clone)]
pub struct PgExpenseRepository {
    pool: PgPool,
}

impl PgExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PgExpenseRepository {
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Expense>, StoreError> {
        let op = Operation::Select;
        let prepare_err = |e| StoreError::new(op, Stage::Prepare, e);

        // Prepared statements are cached per connection, so this is only a
        // round trip the first time a connection sees the query.
        let mut conn = self.pool.acquire().await.map_err(prepare_err)?;
        let stmt = (&mut *conn).prepare(SELECT_BY_ID).await.map_err(prepare_err)?;

        let row = stmt
            .query()
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| StoreError::from_exec(op, e))?;

        match row {
            Some(row) => Expense::from_row(&row)
                .map(Some)
                .map_err(|e| StoreError::new(op, Stage::Scan, e)),
            None => {
                debug!(id, "expense not found");
                Ok(None)
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<Expense>, StoreError> {
        let op = Operation::List;
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_exec(op, e))?;

        rows.iter()
            .map(Expense::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::new(op, Stage::Scan, e))
    }

    async fn replace_by_id(&self, id: i32, fields: &ExpenseFields) -> Result<u64, StoreError> {
        let op = Operation::Update;
        let prepare_err = |e| StoreError::new(op, Stage::Prepare, e);

        let mut conn = self.pool.acquire().await.map_err(prepare_err)?;
        let stmt = (&mut *conn).prepare(UPDATE_BY_ID).await.map_err(prepare_err)?;

        let result = stmt
            .query()
            .bind(id)
            .bind(&fields.title)
            .bind(fields.amount)
            .bind(&fields.note)
            .bind(&fields.tags)
            .execute(&mut *conn)
            .await
            .map_err(|e| StoreError::new(op, Stage::Exec, e))?;

        let affected = result.rows_affected();
        if affected == 0 {
            debug!(id, "update matched no expense");
        } else {
            debug!(id, "update success");
        }
        Ok(affected)
    }

    async fn insert(&self, fields: &ExpenseFields) -> Result<i32, StoreError> {
        // INSERT ... RETURNING keeps this to a single round trip
        let id: i32 = sqlx::query_scalar(INSERT)
            .bind(&fields.title)
            .bind(fields.amount)
            .bind(&fields.note)
            .bind(&fields.tags)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_exec(Operation::Insert, e))?;

        debug!(id, "expense created");
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_exec(Operation::Ping, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_scan_stage() {
        let err = StoreError::from_exec(
            Operation::Select,
            sqlx::Error::ColumnNotFound("tags".into()),
        );
        assert_eq!(err.stage, Stage::Scan);
        assert_eq!(err.describe(), "can't scan expenses");
    }

    #[test]
    fn other_failures_are_exec_stage() {
        let err = StoreError::from_exec(Operation::Update, sqlx::Error::PoolTimedOut);
        assert_eq!(err.stage, Stage::Exec);
        assert_eq!(err.describe(), "can't execute update expenses statement");
        assert!(err.to_string().starts_with("can't execute update expenses statement: "));
    }

    #[test]
    fn prepare_failures_name_the_operation() {
        let err = StoreError::new(Operation::Select, Stage::Prepare, sqlx::Error::PoolClosed);
        assert_eq!(err.describe(), "can't prepare query expenses statement");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn statements_are_parameterized() {
        for sql in [SELECT_BY_ID, UPDATE_BY_ID, INSERT] {
            assert!(sql.contains("$1"), "statement not parameterized: {}", sql);
        }
        assert!(INSERT.ends_with("RETURNING id"));
        assert!(SELECT_ALL.ends_with("ORDER BY id"));
    }
}
