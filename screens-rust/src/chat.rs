//! KhetGuru chat: an append-only transcript backed by a stateless
//! request/reply endpoint.

use agri_portal_sdk::{api, PortalBackend, PortalError};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, warn};

pub const GREETING: &str =
    "Namaste! I'm KhetGuru. Ask me about soil, weather, crops, mandi rates or insurance.";
const NETWORK_ERROR_REPLY: &str = "Network error contacting KhetGuru.";
const DEFAULT_FAILURE_DETAIL: &str = "Failed to respond";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// What a [`ChatSession::send`] did to the transcript.
#[derive(Debug)]
pub enum ChatExchange {
    /// The input was blank. Nothing was sent or recorded.
    Ignored,
    /// The assistant answered.
    Replied,
    /// The request failed. An error message was appended in place of a
    /// reply.
    Failed(PortalError),
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING, Utc::now())],
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `input` to the assistant.
    ///
    /// Non-blank input always adds two messages: the user's, then either
    /// the reply or an error notice.
    pub async fn send(&mut self, backend: &dyn PortalBackend, input: &str) -> ChatExchange {
        let text = input.trim();
        if text.is_empty() {
            return ChatExchange::Ignored;
        }
        self.messages
            .push(ChatMessage::new(ChatRole::User, text, Utc::now()));

        match api::chat(backend, text).await {
            Ok(reply) => {
                let timestamp = parse_timestamp(&reply.timestamp).unwrap_or_else(|| {
                    warn!(timestamp = %reply.timestamp, "unparsable chat timestamp");
                    Utc::now()
                });
                self.messages
                    .push(ChatMessage::new(ChatRole::Assistant, reply.reply, timestamp));
                ChatExchange::Replied
            }
            Err(err) => {
                error!(error = %err, "chat request failed");
                self.messages.push(ChatMessage::new(
                    ChatRole::Assistant,
                    failure_reply(&err),
                    Utc::now(),
                ));
                ChatExchange::Failed(err)
            }
        }
    }
}

fn failure_reply(error: &PortalError) -> String {
    match error {
        PortalError::StatusCode(..) | PortalError::Unauthorized(_) => format!(
            "Error: {}",
            error
                .detail()
                .unwrap_or_else(|| DEFAULT_FAILURE_DETAIL.to_string())
        ),
        _ => NETWORK_ERROR_REPLY.to_string(),
    }
}

/// RFC 3339, or an ISO-8601 local time without offset read as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
