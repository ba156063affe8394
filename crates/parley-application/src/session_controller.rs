//! Session controller: the orchestration core.
//!
//! Mediates presentation-adapter intents (send message, upload file, delete
//! file) into backend gateway calls, applies the optimistic/pessimistic
//! update policy to the conversation and the document registry, and
//! publishes state-change events to subscribers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use parley_core::conversation::{ChatMessage, ConversationState};
use parley_core::document::{Document, DocumentRegistry};
use parley_core::error::Result;
use parley_core::event::SessionEvent;
use parley_core::gateway::{BackendGateway, DocumentUpload};

/// Greeting seeded into the transcript on initialization.
pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Orchestrates one chat session against the backend.
///
/// `SessionController` exclusively owns the [`ConversationState`] and
/// [`DocumentRegistry`]; presentation adapters hold only cloned snapshots
/// from the read accessors plus an event subscription. Every mutating
/// document intent ends in a registry refresh rather than a client-side
/// incremental edit, so the registry never drifts from server state.
///
/// # Concurrency
///
/// The conversation and registry live behind separate `RwLock`s, and no
/// lock is held across a gateway call. Document operations therefore stay
/// responsive while a chat send is outstanding. The one serialization point
/// is the chat send itself: a second send while one is in flight is
/// rejected with the busy error. Concurrent refreshes are safe because the
/// registry is replaced wholesale; the last refresh to complete wins.
pub struct SessionController {
    /// Gateway to the backend; the only source of remote effects.
    gateway: Arc<dyn BackendGateway>,
    /// The ordered transcript plus the send state machine.
    conversation: RwLock<ConversationState>,
    /// Mirror of the server-known document set.
    registry: RwLock<DocumentRegistry>,
    /// Subscribed presentation adapters.
    subscribers: RwLock<Vec<UnboundedSender<SessionEvent>>>,
}

impl SessionController {
    /// Creates a controller with empty state.
    ///
    /// Call [`initialize`] exactly once before handing the controller to a
    /// presentation adapter.
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            conversation: RwLock::new(ConversationState::new()),
            registry: RwLock::new(DocumentRegistry::new()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribes a presentation adapter to state-change events.
    ///
    /// Dropped receivers are pruned on the next publish; a dead subscriber
    /// never fails a mutation.
    pub async fn subscribe(&self) -> UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.write().await.push(sender);
        receiver
    }

    /// Performs session startup: seeds the greeting and fetches the initial
    /// document set.
    ///
    /// Called exactly once by whatever constructs the session. There is no
    /// matching shutdown hook; the session holds no resources beyond
    /// in-memory state.
    ///
    /// # Errors
    ///
    /// Returns the refresh error if the initial document fetch fails. The
    /// greeting is seeded regardless, so the session stays usable and the
    /// adapter can retry via [`refresh_documents`].
    ///
    /// [`refresh_documents`]: Self::refresh_documents
    pub async fn initialize(&self) -> Result<()> {
        {
            let mut conversation = self.conversation.write().await;
            conversation.append_bot(GREETING);
        }
        self.publish(SessionEvent::TranscriptUpdated).await;

        self.refresh_documents().await
    }

    /// Handles the text-submit intent.
    ///
    /// Empty (or whitespace-only) input is a no-op. Otherwise the user
    /// message is appended optimistically before the backend is consulted,
    /// and is never rolled back: on success the bot reply follows it, on
    /// failure a locally-synthesized error message does.
    ///
    /// # Errors
    ///
    /// Returns [`ParleyError::Busy`] if a send is already in flight; the
    /// adapter surfaces this as "please wait". A transport failure is *not*
    /// an error here: it is compensated in the transcript and announced via
    /// [`SessionEvent::SendFailed`].
    ///
    /// [`ParleyError::Busy`]: parley_core::ParleyError::Busy
    pub async fn submit_message(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let handle = {
            let mut conversation = self.conversation.write().await;
            // Rejects with Busy while a send is outstanding; nothing appended.
            conversation.begin_send(text)?
        };
        self.publish(SessionEvent::TranscriptUpdated).await;

        tracing::info!(chars = text.len(), "Dispatching chat send");
        match self.gateway.send_message(text).await {
            Ok(reply) => {
                {
                    let mut conversation = self.conversation.write().await;
                    conversation.settle(handle, reply)?;
                }
                self.publish(SessionEvent::TranscriptUpdated).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat send failed");
                {
                    let mut conversation = self.conversation.write().await;
                    conversation.fail(handle, &e.to_string())?;
                }
                self.publish(SessionEvent::TranscriptUpdated).await;
                self.publish(SessionEvent::SendFailed {
                    reason: e.to_string(),
                })
                .await;
                Ok(())
            }
        }
    }

    /// Handles the file-upload intent.
    ///
    /// A blank file name is a no-op. The registry is refreshed after the
    /// attempt regardless of its outcome, so it self-heals even from
    /// partial server-side effects.
    ///
    /// # Errors
    ///
    /// Returns the upload error (after the refresh has run) so the adapter
    /// can surface it; a [`SessionEvent::UploadFailed`] event is published
    /// as well.
    pub async fn submit_upload(&self, upload: DocumentUpload) -> Result<()> {
        if upload.file_name.trim().is_empty() {
            return Ok(());
        }

        tracing::info!(file = %upload.file_name, bytes = upload.bytes.len(), "Uploading document");
        let outcome = self.gateway.upload_document(upload).await;

        // Refresh-after-attempt is unconditional.
        let refresh = self.refresh_documents().await;

        match outcome {
            Ok(()) => refresh,
            Err(e) => {
                tracing::warn!(error = %e, "Upload failed");
                self.publish(SessionEvent::UploadFailed {
                    reason: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Handles the delete intent for a document id.
    ///
    /// The intent is idempotent: an id not present locally (or remotely) is
    /// accepted, and the unconditional refresh simply confirms its absence.
    ///
    /// # Errors
    ///
    /// Returns the delete error (after the refresh has run); a
    /// [`SessionEvent::DeleteFailed`] event is published as well.
    pub async fn request_delete(&self, id: &str) -> Result<()> {
        tracing::info!(document_id = %id, "Deleting document");
        let outcome = self.gateway.delete_document(id).await;

        // Refresh-after-attempt is unconditional.
        let refresh = self.refresh_documents().await;

        match outcome {
            Ok(()) => refresh,
            Err(e) => {
                tracing::warn!(error = %e, "Delete failed");
                self.publish(SessionEvent::DeleteFailed {
                    reason: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Re-fetches the document set and replaces the registry wholesale.
    ///
    /// # Errors
    ///
    /// On failure the previous registry contents are retained (never
    /// cleared) and the error is returned; a
    /// [`SessionEvent::RefreshFailed`] event is published.
    pub async fn refresh_documents(&self) -> Result<()> {
        match self.gateway.list_documents().await {
            Ok(documents) => {
                {
                    let mut registry = self.registry.write().await;
                    registry.replace_all(documents);
                }
                self.publish(SessionEvent::DocumentsUpdated).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Document refresh failed, keeping previous set");
                self.publish(SessionEvent::RefreshFailed {
                    reason: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Returns a snapshot of the ordered transcript.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.read().await.transcript().to_vec()
    }

    /// Returns a snapshot of the known documents in server order.
    pub async fn documents(&self) -> Vec<Document> {
        self.registry.read().await.documents().to_vec()
    }

    /// Returns true while a chat send is outstanding.
    pub async fn is_sending(&self) -> bool {
        self.conversation.read().await.is_sending()
    }

    /// Publishes an event to all live subscribers, pruning dead ones.
    async fn publish(&self, event: SessionEvent) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}
