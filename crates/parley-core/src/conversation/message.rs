//! Transcript message types.
//!
//! This module contains types for representing messages in the conversation
//! transcript, including roles and message content.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Represents the author of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message from the assistant backend, or synthesized locally when a
    /// send fails.
    Bot,
}

/// A single committed message in the transcript.
///
/// Messages are immutable once created and are never removed from the
/// transcript; display order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (RFC 3339 format).
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    /// Creates a bot-authored message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Bot, content)
    }

    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
