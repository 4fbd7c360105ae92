use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::config::ApiConfig;
use crate::database::{Expense, ExpenseFields, ExpenseRepository, StoreError};
use crate::types::{Operation, Stage};

/// Store double backed by an ordered map; ids start at 1
#[derive(Default)]
pub struct InMemoryExpenseRepository {
    rows: RwLock<BTreeMap<i32, Expense>>,
    last_id: AtomicI32,
}

impl InMemoryExpenseRepository {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn get(&self, id: i32) -> Option<Expense> {
        self.rows.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Expense>, StoreError> {
        Ok(self.get(id).await)
    }

    async fn list_all(&self) -> Result<Vec<Expense>, StoreError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn replace_by_id(&self, id: i32, fields: &ExpenseFields) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) => {
                *row = Expense::from_fields(id, fields.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert(&self, fields: &ExpenseFields) -> Result<i32, StoreError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows
            .write()
            .await
            .insert(id, Expense::from_fields(id, fields.clone()));
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store double whose every statement fails at the configured stage
pub struct FailingExpenseRepository {
    pub stage: Stage,
}

impl FailingExpenseRepository {
    fn fail(&self, operation: Operation) -> StoreError {
        StoreError::new(
            operation,
            self.stage,
            sqlx::Error::Protocol("connection reset by peer".to_string()),
        )
    }
}

#[async_trait]
impl ExpenseRepository for FailingExpenseRepository {
    async fn fetch_by_id(&self, _id: i32) -> Result<Option<Expense>, StoreError> {
        Err(self.fail(Operation::Select))
    }

    async fn list_all(&self) -> Result<Vec<Expense>, StoreError> {
        Err(self.fail(Operation::List))
    }

    async fn replace_by_id(&self, _id: i32, _fields: &ExpenseFields) -> Result<u64, StoreError> {
        Err(self.fail(Operation::Update))
    }

    async fn insert(&self, _fields: &ExpenseFields) -> Result<i32, StoreError> {
        Err(self.fail(Operation::Insert))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.fail(Operation::Ping))
    }
}

/// Router wired to the given repository with default limits
pub fn test_router(repository: Arc<dyn ExpenseRepository>) -> Router {
    app(
        AppState::new(repository),
        &ApiConfig { max_request_size_bytes: 1024 * 1024 },
    )
}

/// Send a request with an optional JSON body and decode the JSON response
pub async fn send(router: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    send_request(router, request).await
}

pub async fn send_request(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router request failed");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
