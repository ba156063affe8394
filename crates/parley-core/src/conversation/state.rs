//! Conversation transcript state and the single-send state machine.

use uuid::Uuid;

use super::message::ChatMessage;
use crate::error::{ParleyError, Result};

/// Send-side phase of a conversation.
///
/// A send transition either settles (bot reply appended) or fails (local
/// error message appended); both outcomes land back in `Idle`, so only the
/// resting and in-flight phases carry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    /// No chat request in flight.
    #[default]
    Idle,
    /// A user message has been appended optimistically and the backend
    /// request is outstanding.
    Sending,
}

/// Correlates an optimistic user message with its eventual bot reply or
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendHandle(Uuid);

/// The ordered transcript of exchanged messages plus the send state machine.
///
/// The transcript is append-only and totally ordered: no message is ever
/// reordered, edited in place, or deleted. At most one chat send may be in
/// flight at a time; a second `begin_send` while one is pending is rejected
/// with [`ParleyError::Busy`].
#[derive(Debug, Default)]
pub struct ConversationState {
    transcript: Vec<ChatMessage>,
    phase: SendPhase,
    pending: Option<SendHandle>,
}

impl ConversationState {
    /// Creates an empty conversation in the `Idle` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a send: appends the user message and enters `Sending`.
    ///
    /// The append is optimistic; the caller dispatches the backend request
    /// afterwards and resolves the returned handle with [`settle`] or
    /// [`fail`]. The user message is never rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`ParleyError::Busy`] if a send is already in flight. Nothing
    /// is appended in that case.
    ///
    /// [`settle`]: Self::settle
    /// [`fail`]: Self::fail
    pub fn begin_send(&mut self, text: impl Into<String>) -> Result<SendHandle> {
        if self.phase == SendPhase::Sending {
            return Err(ParleyError::Busy);
        }

        let handle = SendHandle(Uuid::new_v4());
        self.transcript.push(ChatMessage::user(text));
        self.phase = SendPhase::Sending;
        self.pending = Some(handle);
        Ok(handle)
    }

    /// Completes a send with the backend reply and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `handle` does not match the pending send.
    pub fn settle(&mut self, handle: SendHandle, reply: impl Into<String>) -> Result<()> {
        self.resolve(handle)?;
        self.transcript.push(ChatMessage::bot(reply));
        Ok(())
    }

    /// Completes a send that failed and returns to `Idle`.
    ///
    /// Appends exactly one locally-synthesized bot-role message describing
    /// the failure, so the user sees something rather than silence. The
    /// optimistic user message stays in place.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `handle` does not match the pending send.
    pub fn fail(&mut self, handle: SendHandle, reason: &str) -> Result<()> {
        self.resolve(handle)?;
        self.transcript.push(ChatMessage::bot(format!(
            "Sorry, something went wrong while answering ({}). Please try again.",
            reason
        )));
        Ok(())
    }

    /// Appends a bot message outside of a send (e.g. the session greeting).
    pub fn append_bot(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::bot(text));
    }

    /// Returns the ordered transcript.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Returns the current send phase.
    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    /// Returns true while a chat request is outstanding.
    pub fn is_sending(&self) -> bool {
        self.phase == SendPhase::Sending
    }

    fn resolve(&mut self, handle: SendHandle) -> Result<()> {
        if self.pending != Some(handle) {
            return Err(ParleyError::internal(
                "send handle does not match the pending send",
            ));
        }
        self.pending = None;
        self.phase = SendPhase::Idle;
        Ok(())
    }
}
