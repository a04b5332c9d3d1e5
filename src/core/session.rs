//! # Query Session
//!
//! The controller. Owns the timeline, the history cache, and the pending
//! input buffer, and runs the request lifecycle:
//!
//! ```text
//!            submit(non-empty)                settle(matching id)
//!   Idle ─────────────────────────► Submitting ─────────────────────► Idle
//!    ▲  submit(blank) = no-op           │  submit(*) = no-op
//!    └──────────────────────────────────┘
//! ```
//!
//! Only one request is ever in flight. Nothing here performs I/O; the
//! caller sends the returned `QueryRequest` and reports back via `settle`.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::history::HistoryCache;
use crate::core::result::{Origin, QueryRequest, ResultModel};
use crate::core::timeline::MessageTimeline;
use crate::transport::TransportError;

/// Identifies one submit; a settle only lands if it carries the in-flight id.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting { request_id: RequestId },
}

pub struct QuerySession {
    id: String,
    timeline: MessageTimeline,
    history: HistoryCache,
    input: String,
    phase: Phase,
    /// In-flight request issued before the last `new_session`.
    orphaned: Option<RequestId>,
    next_request_id: RequestId,
    revision: u64,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timeline: MessageTimeline::new(),
            history: HistoryCache::new(),
            input: String::new(),
            phase: Phase::Idle,
            orphaned: None,
            next_request_id: 0,
            revision: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timeline(&self) -> &MessageTimeline {
        &self.timeline
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    /// Bumped on every observable change. Renderers compare it to skip redraws.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Replaces the pending input. Allowed while a request is in flight.
    pub fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.touch();
        }
    }

    /// Submits the pending input buffer.
    pub fn submit_input(&mut self) -> Option<QueryRequest> {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Appends the user turn, clears the input buffer, and enters `Submitting`.
    ///
    /// Returns `None` (and changes nothing) when the trimmed question is empty
    /// or another request is still in flight.
    pub fn submit(&mut self, question: &str) -> Option<QueryRequest> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        if let Phase::Submitting { request_id } = self.phase {
            debug!("Submit ignored: request {} still in flight", request_id);
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        self.timeline.push_user(question.to_string());
        self.input.clear();
        self.phase = Phase::Submitting { request_id };
        self.touch();

        info!(
            "Submitted request {} (question_len={})",
            request_id,
            question.len()
        );
        Some(QueryRequest {
            question: question.to_string(),
        })
    }

    /// Id of the request currently in flight, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        match self.phase {
            Phase::Submitting { request_id } => Some(request_id),
            Phase::Idle => None,
        }
    }

    /// Records the outcome of request `request_id` and returns to `Idle`.
    ///
    /// Transport failures become a synthetic failed result that is shown in
    /// the timeline but kept out of the history cache. Outcomes for any other
    /// request id are dropped.
    pub fn settle(
        &mut self,
        request_id: RequestId,
        outcome: Result<ResultModel, TransportError>,
    ) {
        if self.in_flight() != Some(request_id) {
            warn!(
                "Dropping result for request {} (in flight: {:?})",
                request_id,
                self.in_flight()
            );
            return;
        }

        self.phase = Phase::Idle;
        if self.orphaned.take() == Some(request_id) {
            warn!("Discarding result of request {} from a previous session", request_id);
            self.touch();
            return;
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Request {} failed in transport: {}", request_id, e);
                ResultModel::connection_failure()
            }
        };

        let result = Arc::new(result);
        self.timeline.push_assistant(Arc::clone(&result));
        if result.origin() == Origin::Backend {
            self.history.push(result);
        }
        self.touch();
        debug!(
            "Request {} settled: timeline={}, history={}",
            request_id,
            self.timeline.len(),
            self.history.len()
        );
    }

    /// Empties the history cache; the timeline is untouched.
    pub fn clear_history(&mut self) {
        if !self.history.is_empty() {
            self.history.clear();
            self.touch();
        }
        debug!("History cleared");
    }

    /// Starts a fresh conversation: clears the timeline and the history cache.
    ///
    /// An in-flight request keeps blocking submits until it settles; its
    /// result is then discarded because it belongs to the old conversation.
    pub fn new_session(&mut self) {
        self.timeline.clear();
        self.history.clear();
        self.id = uuid::Uuid::new_v4().to_string();
        if let Phase::Submitting { request_id } = self.phase {
            self.orphaned = Some(request_id);
        }
        self.touch();
        info!("New session {}", self.id);
    }
}
