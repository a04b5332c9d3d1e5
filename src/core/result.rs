//! # Result Model
//!
//! The normalized shape of one completed query attempt, success or failure.
//! Field names on the wire follow the query service (`sql_query`, `results`);
//! in Rust they read as `sql_query` and `rows`.
//!
//! A `ResultModel` is immutable once built. The session wraps it in an
//! `Arc` so the timeline entry and the history cache share the same value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name → value, in the order the service sent them.
pub type Row = Map<String, Value>;

/// Explanation shown when the query service could not be reached at all.
pub const CONNECTION_FAILURE_EXPLANATION: &str =
    "Failed to connect to the query service. Please make sure the API is running and reachable.";

/// Short label carried in `error` for a client-synthesized connectivity failure.
pub const CONNECTION_FAILURE_LABEL: &str = "Connection error";

/// Outbound request body: `{ "question": "..." }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
}

/// Where a result came from. Only results the backend itself decided on
/// are eligible for the history cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Backend,
    /// Built locally because the transport call failed.
    Transport,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultModel {
    /// Generated SQL. Empty when generation failed before producing any.
    #[serde(default)]
    pub sql_query: String,
    #[serde(rename = "results", default)]
    pub rows: Vec<Row>,
    pub explanation: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    origin: Origin,
}

impl ResultModel {
    /// Normalizes a payload received from the query service.
    ///
    /// A failed result never carries rows, even if the service sent some.
    pub fn from_backend(mut payload: ResultModel) -> Self {
        if !payload.success && !payload.rows.is_empty() {
            log::debug!(
                "Dropping {} rows from unsuccessful result",
                payload.rows.len()
            );
            payload.rows.clear();
        }
        payload.origin = Origin::Backend;
        payload
    }

    /// The result recorded when the transport call itself failed.
    pub fn connection_failure() -> Self {
        Self {
            sql_query: String::new(),
            rows: Vec::new(),
            explanation: CONNECTION_FAILURE_EXPLANATION.to_string(),
            success: false,
            error: Some(CONNECTION_FAILURE_LABEL.to_string()),
            origin: Origin::Transport,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn has_sql(&self) -> bool {
        !self.sql_query.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_service_payload_with_ordered_columns() {
        let body = r#"{
            "sql_query": "SELECT provider, cost FROM billing",
            "results": [{"provider": "aws", "cost": 12.5}, {"provider": "gcp", "cost": 3}],
            "explanation": "Costs per provider",
            "success": true
        }"#;
        let parsed: ResultModel = serde_json::from_str(body).unwrap();
        let result = ResultModel::from_backend(parsed);

        assert!(result.success);
        assert_eq!(result.error, None);
        assert_eq!(result.row_count(), 2);
        let keys: Vec<&String> = result.rows[0].keys().collect();
        assert_eq!(keys, ["provider", "cost"]);
        assert_eq!(result.origin(), Origin::Backend);
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = r#"{"explanation": "nothing to do", "success": false, "error": "bad"}"#;
        let result: ResultModel = serde_json::from_str(body).unwrap();
        assert_eq!(result.sql_query, "");
        assert!(result.rows.is_empty());
        assert_eq!(result.error.as_deref(), Some("bad"));
    }

    #[test]
    fn unsuccessful_backend_result_drops_rows() {
        let payload = ResultModel {
            sql_query: "SELECT 1".into(),
            rows: vec![json!({"a": 1}).as_object().unwrap().clone()],
            explanation: "timeout".into(),
            success: false,
            error: Some("timeout".into()),
            origin: Origin::Transport,
        };
        let result = ResultModel::from_backend(payload);
        assert!(result.rows.is_empty());
        assert_eq!(result.sql_query, "SELECT 1");
        assert_eq!(result.origin(), Origin::Backend);
    }

    #[test]
    fn connection_failure_shape() {
        let result = ResultModel::connection_failure();
        assert!(!result.success);
        assert!(result.sql_query.is_empty());
        assert!(result.rows.is_empty());
        assert!(!result.explanation.is_empty());
        assert_eq!(result.error.as_deref(), Some(CONNECTION_FAILURE_LABEL));
        assert_eq!(result.origin(), Origin::Transport);
    }

    #[test]
    fn request_serializes_question_only() {
        let req = QueryRequest {
            question: "top costs".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"question": "top costs"})
        );
    }
}
