//! # Actions
//!
//! Everything that can happen to a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The query service answers? That's `Action::QuerySettled { .. }`.
//!
//! `update()` applies an action to the session and returns an `Effect`
//! describing the side effect the adapter must perform. No I/O happens here.
//!
//! ```text
//! Session + Action  →  update()  →  Session' + Effect
//! ```
//!
//! The one suspension point lives in [`run_query`]: the adapter awaits it on
//! a background task and feeds the resulting action back into `update()`.

use log::debug;

use crate::core::result::{QueryRequest, ResultModel};
use crate::core::session::{QuerySession, RequestId};
use crate::transport::{QueryTransport, TransportError};

#[derive(Debug)]
pub enum Action {
    /// Input buffer edited.
    InputChanged(String),
    /// Submit whatever is in the input buffer.
    Submit,
    QuerySettled {
        request_id: RequestId,
        outcome: Result<ResultModel, TransportError>,
    },
    ClearHistory,
    NewSession,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Send this request and report back with `Action::QuerySettled`.
    SendQuery {
        request_id: RequestId,
        request: QueryRequest,
    },
    Quit,
}

pub fn update(session: &mut QuerySession, action: Action) -> Effect {
    match action {
        Action::InputChanged(text) => {
            session.set_input(text);
            Effect::None
        }
        Action::Submit => match (session.submit_input(), session.in_flight()) {
            (Some(request), Some(request_id)) => Effect::SendQuery {
                request_id,
                request,
            },
            _ => Effect::None,
        },
        Action::QuerySettled {
            request_id,
            outcome,
        } => {
            session.settle(request_id, outcome);
            Effect::None
        }
        Action::ClearHistory => {
            session.clear_history();
            Effect::None
        }
        Action::NewSession => {
            session.new_session();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Sends one request and wraps the outcome as the action that settles it.
/// Never fails: transport errors travel inside the action.
pub async fn run_query(
    transport: &dyn QueryTransport,
    request_id: RequestId,
    request: QueryRequest,
) -> Action {
    debug!("Running request {} via {}", request_id, transport.describe());
    let outcome = transport.send(&request).await;
    Action::QuerySettled {
        request_id,
        outcome,
    }
}
