//! Conversation domain module.
//!
//! Contains the transcript message types and the conversation state with its
//! single-send state machine.
//!
//! # Module Structure
//!
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`)
//! - `state`: Transcript state and send state machine (`ConversationState`,
//!   `SendPhase`, `SendHandle`)

mod message;
mod state;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use state::{ConversationState, SendHandle, SendPhase};
