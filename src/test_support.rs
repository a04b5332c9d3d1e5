//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::core::result::{QueryRequest, ResultModel};
use crate::transport::{QueryTransport, TransportError};

/// A transport that replays canned outcomes in order and records questions.
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<ResultModel, TransportError>>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<ResultModel, TransportError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryTransport for ScriptedTransport {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn send(&self, request: &QueryRequest) -> Result<ResultModel, TransportError> {
        self.questions
            .lock()
            .unwrap()
            .push(request.question.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".into())))
    }
}

/// A successful service result with `count` rows of `{a, b}`.
pub fn backend_rows(sql: &str, count: usize) -> ResultModel {
    let rows: Vec<_> = (0..count).map(|i| json!({"a": i, "b": i * 2})).collect();
    let payload = json!({
        "sql_query": sql,
        "results": rows,
        "explanation": format!("{count} rows"),
        "success": true,
    });
    ResultModel::from_backend(serde_json::from_value(payload).unwrap())
}

/// A failure decided by the service itself (it answered, but said no).
pub fn backend_failure(message: &str) -> ResultModel {
    let payload = json!({
        "sql_query": "",
        "results": [],
        "explanation": message,
        "success": false,
        "error": message,
    });
    ResultModel::from_backend(serde_json::from_value(payload).unwrap())
}
