//! Session events published to presentation adapters.

use serde::{Deserialize, Serialize};

/// State-change notifications a session publishes to its subscribers.
///
/// Adapters re-render from the controller's read accessors when an
/// `*Updated` event arrives. Failure events carry the reason so document
/// operation failures stay distinguishable instead of being swallowed into
/// a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The transcript changed (message appended).
    TranscriptUpdated,
    /// The document registry was replaced with a fresh server set.
    DocumentsUpdated,
    /// A chat send failed; a synthesized error message was appended.
    SendFailed { reason: String },
    /// An upload attempt failed. A refresh has already run.
    UploadFailed { reason: String },
    /// A delete attempt failed. A refresh has already run.
    DeleteFailed { reason: String },
    /// A registry refresh failed; the previous document set is retained.
    RefreshFailed { reason: String },
}
