//! HTTP transport: `POST <base_url><query_path>` with `{"question": ...}`.
//!
//! No client-side timeout is applied; the call runs until the service
//! answers or the connection fails.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::core::result::{QueryRequest, ResultModel};
use crate::transport::{QueryTransport, TransportError};

pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, query_path: &str) -> Self {
        Self {
            endpoint: join_url(base_url, query_path),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Joins base and path with exactly one slash between them.
fn join_url(base_url: &str, query_path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = query_path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn send(&self, request: &QueryRequest) -> Result<ResultModel, TransportError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| TransportError::Config(format!("{}: {e}", self.endpoint)))?;

        info!(
            "Query request: endpoint={}, question_len={}",
            self.endpoint,
            request.question.len()
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Query service response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Query service error: {} - {}", status, err_body);
            return Err(TransportError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let payload: ResultModel = serde_json::from_str(&body).map_err(|e| {
            warn!("Malformed query response ({} bytes): {}", body.len(), e);
            TransportError::Parse(e.to_string())
        })?;

        debug!(
            "Query settled: success={}, rows={}, sql_len={}",
            payload.success,
            payload.rows.len(),
            payload.sql_query.len()
        );
        Ok(ResultModel::from_backend(payload))
    }
}
