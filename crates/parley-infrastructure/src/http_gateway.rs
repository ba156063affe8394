//! HTTP implementation of the backend gateway.
//!
//! Maps the four gateway operations onto the backend's REST contract:
//!
//! | Operation      | Method | Path                   |
//! |----------------|--------|------------------------|
//! | list documents | GET    | `/api/documents`       |
//! | send message   | POST   | `/api/chat`            |
//! | upload         | POST   | `/api/upload`          |
//! | delete         | DELETE | `/api/documents/{id}`  |
//!
//! One attempt per call, no retries. Non-success statuses and body-parse
//! failures are classified per the shared error taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use parley_core::config::BackendConfig;
use parley_core::document::Document;
use parley_core::error::{ParleyError, Result};
use parley_core::gateway::{BackendGateway, DocumentUpload};

/// Gateway talking to the chat/retrieval backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackendGateway {
    client: Client,
    base_url: String,
    chat_timeout: Duration,
    request_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

impl HttpBackendGateway {
    /// Creates a gateway from backend connection settings.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_timeout: Duration::from_secs(config.chat_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        tracing::debug!("Fetching document list");
        let response = self
            .client
            .get(self.url("/api/documents"))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ParleyError::transport(format!("Failed to fetch documents: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Document list request failed");
            let body = read_body(response).await;
            return Err(ParleyError::transport(format!(
                "Document list error ({}): {}",
                status, body
            )));
        }

        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| ParleyError::transport(format!("Failed to parse document list: {}", e)))
    }

    async fn send_message(&self, text: &str) -> Result<String> {
        tracing::debug!(chars = text.len(), "Posting chat message");
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&ChatRequest { message: text })
            .timeout(self.chat_timeout)
            .send()
            .await
            .map_err(|e| ParleyError::transport(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Chat request failed");
            let body = read_body(response).await;
            return Err(ParleyError::transport(format!(
                "Chat error ({}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParleyError::transport(format!("Failed to parse chat reply: {}", e)))?;

        Ok(chat_response.reply)
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<()> {
        tracing::debug!(file = %upload.file_name, bytes = upload.bytes.len(), "Posting upload");
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&mime_for(&upload.file_name))
            .map_err(|e| ParleyError::internal(format!("Invalid upload content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ParleyError::transport(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Upload request failed");
            let body = read_body(response).await;
            return Err(upload_failure(status, &body));
        }

        // Response body is implementation-defined; only the status matters.
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        tracing::debug!(document_id = %id, "Posting delete");
        let response = self
            .client
            .delete(self.url(&format!("/api/documents/{}", id)))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ParleyError::transport(format!("Delete request failed: {}", e)))?;

        let status = response.status();
        // Response body is implementation-defined; only the status matters.
        let body = read_body(response).await;
        match delete_failure(status, &body) {
            None => Ok(()),
            Some(err) => {
                tracing::warn!(status = %status, "Delete request failed");
                Err(err)
            }
        }
    }
}

/// Classifies a non-success upload status.
///
/// Client errors mean the server looked at the file and rejected it;
/// everything else is a transport-level failure.
fn upload_failure(status: StatusCode, body: &str) -> ParleyError {
    if status.is_client_error() {
        ParleyError::validation(format!("Upload rejected ({}): {}", status, body))
    } else {
        ParleyError::transport(format!("Upload error ({}): {}", status, body))
    }
}

/// Classifies a delete response status.
///
/// Deleting a nonexistent id is a no-op success (idempotent), so 404 maps
/// to `None` alongside the success statuses; any other non-success status
/// is a transport-level failure.
fn delete_failure(status: StatusCode, body: &str) -> Option<ParleyError> {
    if status.is_success() || status == StatusCode::NOT_FOUND {
        return None;
    }
    Some(ParleyError::transport(format!(
        "Delete error ({}): {}",
        status, body
    )))
}

/// Guesses the content type for an upload from its file name.
fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::config::BackendConfig;

    #[test]
    fn test_upload_failure_classification() {
        let rejected = upload_failure(StatusCode::UNPROCESSABLE_ENTITY, "bad file type");
        assert!(rejected.is_validation());

        let bad_request = upload_failure(StatusCode::BAD_REQUEST, "missing field");
        assert!(bad_request.is_validation());

        let server_error = upload_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(server_error.is_transport());
    }

    #[test]
    fn test_delete_status_classification() {
        assert!(delete_failure(StatusCode::OK, "").is_none());
        assert!(delete_failure(StatusCode::NO_CONTENT, "").is_none());
        // Deleting a nonexistent id is a no-op success.
        assert!(delete_failure(StatusCode::NOT_FOUND, "missing").is_none());

        let server_error = delete_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap();
        assert!(server_error.is_transport());

        let forbidden = delete_failure(StatusCode::FORBIDDEN, "denied").unwrap();
        assert!(forbidden.is_transport());
    }

    #[test]
    fn test_mime_guess_from_file_name() {
        assert_eq!(mime_for("notes.pdf"), "application/pdf");
        assert_eq!(mime_for("readme.txt"), "text/plain");
        assert_eq!(mime_for("blob"), "application/octet-stream");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:8000/".to_string(),
            ..Default::default()
        };
        let gateway = HttpBackendGateway::new(&config);
        assert_eq!(gateway.url("/api/chat"), "http://127.0.0.1:8000/api/chat");
    }
}
