use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only conversation log for one page session. Never truncated.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<TranscriptMessage>,
    next_id: u64,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(TranscriptMessage {
            id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::User, content)
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::Assistant, content)
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptMessage> {
        self.messages.last()
    }
}
