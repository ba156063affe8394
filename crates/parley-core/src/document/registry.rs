//! Local mirror of the server-known document set.

use std::collections::{HashMap, HashSet};

use super::model::Document;

/// The client's mirror of the documents registered on the backend.
///
/// The registry is a pure reflection of server state: it is only ever
/// updated by whole-set replacement from a fresh `list_documents` response,
/// never by client-side incremental edits. On a failed refresh the caller
/// leaves the registry untouched, so observers see either the old complete
/// set or the new complete set and never a mix.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
}

impl DocumentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire document set atomically.
    ///
    /// Duplicate ids in the incoming set are collapsed: the last occurrence
    /// wins, keeping the position of the first. The registry never holds two
    /// documents with the same id.
    pub fn replace_all(&mut self, documents: Vec<Document>) {
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut deduped: Vec<Document> = Vec::with_capacity(documents.len());

        for document in documents {
            match by_id.get(&document.id) {
                Some(&index) => deduped[index] = document,
                None => {
                    by_id.insert(document.id.clone(), deduped.len());
                    deduped.push(document);
                }
            }
        }

        self.documents = deduped;
    }

    /// Returns the current document set in server order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns the set of known document ids.
    pub fn member_ids(&self) -> HashSet<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    /// Returns true if a document with the given id is known.
    pub fn contains(&self, id: &str) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    /// Returns the number of known documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are known.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
