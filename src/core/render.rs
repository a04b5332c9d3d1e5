//! # Result Render Contract
//!
//! Pure projection of a `ResultModel` into what a renderer must show.
//! Same input, same output; the input is never modified.
//!
//! ```text
//! ResultModel ──► ResultView
//!                 ├── status      Success | Failure
//!                 ├── sql         Some(text) only when non-empty
//!                 ├── explanation always
//!                 └── body        Table | NoResults | Failed
//! ```

use serde_json::Value;

use crate::core::result::{ResultModel, Row};

/// At most this many data rows are rendered per result.
pub const MAX_RENDERED_ROWS: usize = 100;

pub const NO_RESULTS_TEXT: &str = "Query executed successfully but returned no results.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Success => "Query executed successfully",
            Status::Failure => "Query failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// First-row keys, in first-row order.
    pub headers: Vec<String>,
    /// At most `MAX_RENDERED_ROWS` formatted rows.
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl TableView {
    fn from_rows(rows: &[Row]) -> Option<Self> {
        let first = rows.first()?;
        let headers: Vec<String> = first.keys().cloned().collect();
        let rendered = rows
            .iter()
            .take(MAX_RENDERED_ROWS)
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();
        Some(Self {
            headers,
            rows: rendered,
            total_rows: rows.len(),
        })
    }

    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }

    /// Footer shown under the table. `None` unless truncated.
    pub fn truncation_note(&self) -> Option<String> {
        self.is_truncated().then(|| {
            format!(
                "Showing first {} results of {} total",
                self.rows.len(),
                self.total_rows
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBody {
    Table(TableView),
    NoResults,
    /// Failure: a status indicator only, never a table.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView<'a> {
    pub status: Status,
    pub sql: Option<&'a str>,
    pub explanation: &'a str,
    pub body: ResultBody,
}

impl<'a> ResultView<'a> {
    pub fn new(result: &'a ResultModel) -> Self {
        let status = if result.success {
            Status::Success
        } else {
            Status::Failure
        };
        let body = match status {
            Status::Failure => ResultBody::Failed,
            Status::Success => TableView::from_rows(&result.rows)
                .map(ResultBody::Table)
                .unwrap_or(ResultBody::NoResults),
        };
        Self {
            status,
            sql: result.has_sql().then_some(result.sql_query.as_str()),
            explanation: &result.explanation,
            body,
        }
    }

    pub fn table(&self) -> Option<&TableView> {
        match &self.body {
            ResultBody::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Strings render raw; everything else renders as compact JSON.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
