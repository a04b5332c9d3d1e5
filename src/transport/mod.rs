//! # Transport
//!
//! The seam between the session engine and the query service. The core only
//! sees [`QueryTransport`]: hand it a question, get back a result or a
//! [`TransportError`]. HTTP details live in [`http`].

pub mod http;

use std::fmt;

use async_trait::async_trait;

use crate::core::result::{QueryRequest, ResultModel};

pub use http::HttpTransport;

/// Errors that can occur while talking to the query service.
/// Every variant ends up as the same connectivity-failure result in the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Transport misconfigured (unparseable base URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Service answered with a non-success status.
    Api { status: u16, message: String },
    /// Body was not a result payload.
    Parse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Config(msg) => write!(f, "config error: {msg}"),
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Short name for logs and the title bar.
    fn describe(&self) -> String;

    /// Sends one question and waits for the service's answer.
    async fn send(&self, request: &QueryRequest) -> Result<ResultModel, TransportError>;
}
