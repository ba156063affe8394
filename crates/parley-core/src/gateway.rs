//! Backend gateway trait.
//!
//! Defines the interface for the four remote operations the orchestration
//! layer depends on.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// A file selected for upload: its display name and raw bytes.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// File name as picked by the user; also used to guess the content type.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Creates an upload payload from a file name and its bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// An abstract gateway to the chat/retrieval backend.
///
/// This trait defines the contract for the four remote operations,
/// decoupling the orchestration logic from the transport (HTTP in
/// production, mocks in tests). Implementations perform pure
/// request/response mapping with failure classification: no business logic,
/// no retries, one attempt per call.
///
/// Failure classification follows the shared taxonomy: network/HTTP/parse
/// failures are `Transport`, server-side input rejections are `Validation`.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Lists the documents currently registered on the backend.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Document>)`: The complete server-known document set
    /// - `Err(Transport)`: Network, status, or parse failure
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Sends a chat message and returns the backend's reply text.
    ///
    /// A failure never substitutes a synthetic reply; compensation is the
    /// caller's responsibility.
    ///
    /// # Arguments
    ///
    /// * `text` - The user's message; callers pass non-empty text
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The reply text
    /// - `Err(Transport)`: Network, status, or parse failure
    async fn send_message(&self, text: &str) -> Result<String>;

    /// Uploads a document for indexing.
    ///
    /// Success means the server has durably registered the document.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Document registered server-side
    /// - `Err(Validation)`: The server rejected the file
    /// - `Err(Transport)`: Network or status failure
    async fn upload_document(&self, upload: DocumentUpload) -> Result<()>;

    /// Deletes a document by its server-assigned id.
    ///
    /// Deleting a nonexistent id is tolerated as a no-op success.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Document deleted, or it did not exist
    /// - `Err(Transport)`: Network or status failure
    async fn delete_document(&self, id: &str) -> Result<()>;
}
