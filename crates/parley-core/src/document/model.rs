//! Knowledge-base document model.

use serde::{Deserialize, Serialize};

/// A document known to the backend's knowledge base.
///
/// Both fields are assigned server-side: documents are created on upload,
/// discovered via registry refresh, and destroyed on delete. The client
/// never assigns or mutates `id` or `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned unique identifier. Opaque to the client.
    pub id: String,
    /// Display label.
    pub name: String,
}

impl Document {
    /// Creates a document from its server-assigned fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
