//! End-to-end controller flows against a mocked backend gateway.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use parley_application::{GREETING, SessionController};
use parley_core::conversation::MessageRole;
use parley_core::document::Document;
use parley_core::error::{ParleyError, Result};
use parley_core::event::SessionEvent;
use parley_core::gateway::{BackendGateway, DocumentUpload};

/// Scriptable gateway: queued list responses, one-shot results for the
/// other operations, and call counters.
#[derive(Default)]
struct MockGateway {
    list_results: Mutex<VecDeque<Result<Vec<Document>>>>,
    list_calls: AtomicUsize,
    send_result: Mutex<Option<Result<String>>>,
    send_calls: AtomicUsize,
    upload_result: Mutex<Option<Result<()>>>,
    delete_result: Mutex<Option<Result<()>>>,
}

impl MockGateway {
    fn queue_list(&self, result: Result<Vec<Document>>) {
        self.list_results.lock().unwrap().push_back(result);
    }

    fn set_send(&self, result: Result<String>) {
        *self.send_result.lock().unwrap() = Some(result);
    }

    fn set_upload(&self, result: Result<()>) {
        *self.upload_result.lock().unwrap() = Some(result);
    }

    fn set_delete(&self, result: Result<()>) {
        *self.delete_result.lock().unwrap() = Some(result);
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_message(&self, _text: &str) -> Result<String> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.send_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }

    async fn upload_document(&self, _upload: DocumentUpload) -> Result<()> {
        self.upload_result.lock().unwrap().take().unwrap_or(Ok(()))
    }

    async fn delete_document(&self, _id: &str) -> Result<()> {
        self.delete_result.lock().unwrap().take().unwrap_or(Ok(()))
    }
}

/// Gateway whose chat send parks until released, for in-flight assertions.
#[derive(Default)]
struct BlockingGateway {
    release: Notify,
}

#[async_trait]
impl BackendGateway for BlockingGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(Vec::new())
    }

    async fn send_message(&self, _text: &str) -> Result<String> {
        self.release.notified().await;
        Ok("released".to_string())
    }

    async fn upload_document(&self, _upload: DocumentUpload) -> Result<()> {
        Ok(())
    }

    async fn delete_document(&self, _id: &str) -> Result<()> {
        Ok(())
    }
}

fn drain(receiver: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_initialize_seeds_greeting_and_documents() {
    let gateway = Arc::new(MockGateway::default());
    gateway.queue_list(Ok(vec![Document::new("1", "a.pdf")]));
    let controller = SessionController::new(gateway.clone());
    let mut events = controller.subscribe().await;

    controller.initialize().await.unwrap();

    let transcript = controller.transcript().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].role, MessageRole::Bot);
    assert_eq!(transcript[0].content, GREETING);
    assert_eq!(controller.documents().await, vec![Document::new("1", "a.pdf")]);
    assert_eq!(
        drain(&mut events),
        vec![SessionEvent::TranscriptUpdated, SessionEvent::DocumentsUpdated]
    );
}

#[tokio::test]
async fn test_submit_message_round_trip() {
    let gateway = Arc::new(MockGateway::default());
    let controller = SessionController::new(gateway.clone());
    controller.initialize().await.unwrap();

    gateway.set_send(Ok("Hi there".to_string()));
    controller.submit_message("Hello").await.unwrap();

    let contents: Vec<(MessageRole, String)> = controller
        .transcript()
        .await
        .into_iter()
        .map(|m| (m.role, m.content))
        .collect();
    assert_eq!(
        contents,
        vec![
            (MessageRole::Bot, GREETING.to_string()),
            (MessageRole::User, "Hello".to_string()),
            (MessageRole::Bot, "Hi there".to_string()),
        ]
    );
    assert!(!controller.is_sending().await);
}

#[tokio::test]
async fn test_blank_submit_is_a_noop() {
    let gateway = Arc::new(MockGateway::default());
    let controller = SessionController::new(gateway.clone());

    controller.submit_message("").await.unwrap();
    controller.submit_message("   ").await.unwrap();

    assert!(controller.transcript().await.is_empty());
    assert_eq!(gateway.send_calls(), 0);
}

#[tokio::test]
async fn test_failed_send_synthesizes_one_error_message() {
    let gateway = Arc::new(MockGateway::default());
    gateway.set_send(Err(ParleyError::transport("connection refused")));
    let controller = SessionController::new(gateway.clone());
    let mut events = controller.subscribe().await;

    controller.submit_message("Hello").await.unwrap();

    let transcript = controller.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, MessageRole::User);
    assert_eq!(transcript[1].role, MessageRole::Bot);
    assert!(transcript[1].content.contains("connection refused"));
    assert!(!controller.is_sending().await);

    let failure_events: Vec<SessionEvent> = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::SendFailed { .. }))
        .collect();
    assert_eq!(failure_events.len(), 1);
}

#[tokio::test]
async fn test_second_send_while_pending_is_rejected() {
    let gateway = Arc::new(BlockingGateway::default());
    let controller = Arc::new(SessionController::new(gateway.clone()));

    let background = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.submit_message("first").await })
    };
    while !controller.is_sending().await {
        tokio::task::yield_now().await;
    }

    let err = controller.submit_message("second").await.unwrap_err();
    assert!(err.is_busy());
    // The rejected send appended no second user message.
    assert_eq!(controller.transcript().await.len(), 1);

    gateway.release.notify_one();
    background.await.unwrap().unwrap();

    assert!(!controller.is_sending().await);
    let transcript = controller.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].content, "released");
}

#[tokio::test]
async fn test_document_panel_stays_responsive_during_send() {
    let gateway = Arc::new(BlockingGateway::default());
    let controller = Arc::new(SessionController::new(gateway.clone()));

    let background = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.submit_message("slow question").await })
    };
    while !controller.is_sending().await {
        tokio::task::yield_now().await;
    }

    // Document intents are not serialized against the outstanding send.
    controller.refresh_documents().await.unwrap();
    controller.request_delete("any").await.unwrap();

    gateway.release.notify_one();
    background.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_upload_triggers_refresh() {
    let gateway = Arc::new(MockGateway::default());
    gateway.set_upload(Ok(()));
    gateway.queue_list(Ok(vec![Document::new("1", "a.pdf")]));
    let controller = SessionController::new(gateway.clone());

    controller
        .submit_upload(DocumentUpload::new("a.pdf", b"content".to_vec()))
        .await
        .unwrap();

    assert_eq!(controller.documents().await, vec![Document::new("1", "a.pdf")]);
    assert_eq!(gateway.list_calls(), 1);
}

#[tokio::test]
async fn test_upload_failure_still_refreshes_and_surfaces_error() {
    let gateway = Arc::new(MockGateway::default());
    gateway.set_upload(Err(ParleyError::validation("unsupported file type")));
    gateway.queue_list(Ok(vec![]));
    let controller = SessionController::new(gateway.clone());
    let mut events = controller.subscribe().await;

    let err = controller
        .submit_upload(DocumentUpload::new("a.exe", b"content".to_vec()))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    // Refresh-after-attempt ran despite the failure.
    assert_eq!(gateway.list_calls(), 1);
    assert!(
        drain(&mut events)
            .iter()
            .any(|e| matches!(e, SessionEvent::UploadFailed { .. }))
    );
}

#[tokio::test]
async fn test_blank_upload_is_a_noop() {
    let gateway = Arc::new(MockGateway::default());
    let controller = SessionController::new(gateway.clone());

    controller
        .submit_upload(DocumentUpload::new("   ", Vec::new()))
        .await
        .unwrap();

    assert_eq!(gateway.list_calls(), 0);
}

#[tokio::test]
async fn test_delete_empties_registry() {
    let gateway = Arc::new(MockGateway::default());
    gateway.queue_list(Ok(vec![Document::new("1", "a.pdf")]));
    let controller = SessionController::new(gateway.clone());
    controller.initialize().await.unwrap();
    assert_eq!(controller.documents().await.len(), 1);

    gateway.set_delete(Ok(()));
    gateway.queue_list(Ok(vec![]));
    controller.request_delete("1").await.unwrap();

    assert!(controller.documents().await.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_refreshes_once() {
    let gateway = Arc::new(MockGateway::default());
    let controller = SessionController::new(gateway.clone());

    controller.request_delete("never-existed").await.unwrap();

    assert_eq!(gateway.list_calls(), 1);
    assert!(controller.documents().await.is_empty());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_documents() {
    let gateway = Arc::new(MockGateway::default());
    gateway.queue_list(Ok(vec![Document::new("1", "a.pdf")]));
    let controller = SessionController::new(gateway.clone());
    controller.initialize().await.unwrap();
    let mut events = controller.subscribe().await;

    gateway.queue_list(Err(ParleyError::transport("backend down")));
    let err = controller.refresh_documents().await.unwrap_err();

    assert!(err.is_transport());
    // The registry is never cleared on a failed refresh.
    assert_eq!(controller.documents().await, vec![Document::new("1", "a.pdf")]);
    assert!(
        drain(&mut events)
            .iter()
            .any(|e| matches!(e, SessionEvent::RefreshFailed { .. }))
    );
}

#[tokio::test]
async fn test_dropped_subscriber_does_not_fail_publish() {
    let gateway = Arc::new(MockGateway::default());
    let controller = SessionController::new(gateway.clone());

    let receiver = controller.subscribe().await;
    drop(receiver);

    gateway.set_send(Ok("still fine".to_string()));
    controller.submit_message("Hello").await.unwrap();
    assert_eq!(controller.transcript().await.len(), 2);
}
