//! # Message Timeline
//!
//! Ordered, append-only log of turns. A user turn carries the question text;
//! an assistant turn carries the settled `ResultModel`. There is no pending
//! entry: the assistant turn is appended only once its result is known.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::result::ResultModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Unique within a session: `<unix-millis>-<seq>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    fn new(at: DateTime<Utc>, seq: u64) -> Self {
        Self(format!("{}-{}", at.timestamp_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Question text for user turns; empty for assistant turns.
    pub content: String,
    pub result: Option<Arc<ResultModel>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
    next_seq: u64,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, at: DateTime<Utc>) -> MessageId {
        let id = MessageId::new(at, self.next_seq);
        self.next_seq += 1;
        id
    }

    pub fn push_user(&mut self, content: String) -> &Message {
        let created_at = Utc::now();
        let id = self.next_id(created_at);
        self.push(Message {
            id,
            role: Role::User,
            content,
            result: None,
            created_at,
        })
    }

    pub fn push_assistant(&mut self, result: Arc<ResultModel>) -> &Message {
        let created_at = Utc::now();
        let id = self.next_id(created_at);
        self.push(Message {
            id,
            role: Role::Assistant,
            content: String::new(),
            result: Some(result),
            created_at,
        })
    }

    fn push(&mut self, message: Message) -> &Message {
        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    /// Drops every turn. The id sequence keeps counting so ids stay unique
    /// for the lifetime of the process.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
