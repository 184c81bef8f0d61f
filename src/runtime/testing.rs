//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::CompletionGateway;
use crate::gateway::GatewayError;
use crate::llm::LlmError;
use crate::state_machine::Attachment;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Mock gateway that returns queued outcomes
#[derive(Default)]
pub struct MockGateway {
    outcomes: Mutex<VecDeque<Result<String, GatewayError>>>,
    /// Record of every (question, attachment) received
    pub calls: Mutex<Vec<(String, Option<Attachment>)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: LlmError) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::from(error)));
    }

    pub fn recorded_calls(&self) -> Vec<(String, Option<Attachment>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), attachment.cloned()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::from(LlmError::network("No mock outcome queued"))))
    }
}

// ============================================================================
// Gated Gateway
// ============================================================================

/// Holds every call until the test opens the gate, so in-flight state can be
/// observed deterministically
pub struct GatedGateway {
    inner: MockGateway,
    gate: Semaphore,
}

impl GatedGateway {
    pub fn new(inner: MockGateway) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gate: Semaphore::new(0),
        })
    }

    /// Let one pending (or future) call through
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl CompletionGateway for GatedGateway {
    async fn complete(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError> {
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        self.inner.complete(question, attachment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LlmGateway;
    use crate::llm::{LlmRequest, LlmResponse, LlmService};
    use crate::runtime::{start, ConversationHandle, SseEvent, StoreError};
    use crate::state_machine::state::{GATEWAY_FAILURE_TEXT, USAGE_HINT};
    use crate::state_machine::{Author, ConvState, Notification, TransitionError};
    use std::time::Duration;

    async fn settle(handle: &ConversationHandle) -> ConvState {
        tokio::time::timeout(Duration::from_secs(2), handle.wait_idle())
            .await
            .expect("runtime did not settle")
            .unwrap()
    }

    fn authors(state: &ConvState) -> Vec<Author> {
        state.messages.iter().map(|m| m.author).collect()
    }

    #[tokio::test]
    async fn test_mock_gateway() {
        let mock = MockGateway::new();
        mock.queue_reply("Hello");

        assert_eq!(mock.complete("q", None).await.unwrap(), "Hello");
        // Nothing queued any more
        assert!(mock.complete("q", None).await.is_err());
        assert_eq!(mock.recorded_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_without_attachment() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_reply("Please upload a file first");
        let handle = start(Arc::clone(&gateway));

        let submitted = handle.submit("What's the total revenue?").await.unwrap();
        assert!(submitted.busy);
        assert_eq!(authors(&submitted), vec![Author::User]);

        let done = settle(&handle).await;
        assert!(!done.busy);
        assert_eq!(authors(&done), vec![Author::User, Author::Model]);
        assert_eq!(done.messages[0].text, "What's the total revenue?");
        assert_eq!(done.messages[1].text, "Please upload a file first");
        assert_eq!(
            gateway.recorded_calls(),
            vec![("What's the total revenue?".to_string(), None)]
        );
    }

    #[tokio::test]
    async fn test_failure_appends_apology_and_recovers() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_error(LlmError::auth("API key not valid"));
        gateway.queue_reply("42");
        let handle = start(Arc::clone(&gateway));

        handle.submit("total?").await.unwrap();
        let failed = settle(&handle).await;
        assert_eq!(authors(&failed), vec![Author::User, Author::System]);
        assert_eq!(failed.messages[1].text, GATEWAY_FAILURE_TEXT);
        assert!(!failed.busy);

        handle.submit("total again?").await.unwrap();
        let recovered = settle(&handle).await;
        assert_eq!(
            authors(&recovered),
            vec![Author::User, Author::System, Author::User, Author::Model]
        );
        assert_eq!(recovered.messages[3].text, "42");
    }

    #[tokio::test]
    async fn test_busy_refuses_second_submit() {
        let inner = MockGateway::new();
        inner.queue_reply("first answer");
        let gateway = GatedGateway::new(inner);
        let handle = start(Arc::clone(&gateway));

        let first = handle.submit("first").await.unwrap();
        assert!(first.busy);

        let err = handle.submit("second").await.unwrap_err();
        assert!(matches!(err, StoreError::Refused(TransitionError::Busy)));
        assert_eq!(handle.snapshot(), first);

        gateway.release_one();
        let done = settle(&handle).await;
        assert_eq!(authors(&done), vec![Author::User, Author::Model]);
        assert_eq!(gateway.inner.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_submit_changes_nothing() {
        let gateway = Arc::new(MockGateway::new());
        let handle = start(Arc::clone(&gateway));
        handle.update_draft("   ").await.unwrap();
        let before = handle.snapshot();

        let err = handle.submit("   ").await.unwrap_err();
        assert!(matches!(err, StoreError::Refused(TransitionError::EmptyDraft)));
        assert_eq!(handle.snapshot(), before);
        assert!(gateway.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_clears_draft() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_reply("ok");
        let handle = start(Arc::clone(&gateway));

        let drafted = handle.update_draft("How many orders?").await.unwrap();
        assert_eq!(drafted.draft, "How many orders?");
        assert!(drafted.can_submit());

        let submitted = handle.submit(drafted.draft.clone()).await.unwrap();
        assert!(submitted.draft.is_empty());
        settle(&handle).await;
    }

    #[tokio::test]
    async fn test_attach_and_clear() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_reply("Revenue is up");
        let handle = start(Arc::clone(&gateway));

        let attached = handle
            .attach_file(Attachment::new("sales.csv"))
            .await
            .unwrap();
        assert_eq!(attached.attachment, Some(Attachment::new("sales.csv")));
        assert_eq!(authors(&attached), vec![Author::System, Author::System]);
        assert_eq!(attached.messages[1].text, USAGE_HINT);

        handle.submit("Revenue?").await.unwrap();
        let answered = settle(&handle).await;
        assert_eq!(answered.messages.len(), 4);
        assert_eq!(
            gateway.recorded_calls(),
            vec![("Revenue?".to_string(), Some(Attachment::new("sales.csv")))]
        );

        let cleared = handle.clear_attachment().await.unwrap();
        assert!(cleared.messages.is_empty());
        assert!(cleared.attachment.is_none());
    }

    #[tokio::test]
    async fn test_notifications_follow_transitions() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_reply("done");
        let handle = start(Arc::clone(&gateway));
        let (initial, mut rx) = handle.subscribe();
        assert_eq!(initial, ConvState::default());

        handle.submit("go").await.unwrap();
        settle(&handle).await;

        let mut kinds = Vec::new();
        while kinds.len() < 5 {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("notification not delivered")
                .unwrap();
            let SseEvent::Notification(n) = event else {
                panic!("unexpected init event");
            };
            kinds.push(n.event_type());
            if let Notification::Message { message } = &n {
                assert!(!message.id.is_empty());
            }
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(kinds, vec!["message", "draft", "busy", "message", "busy"]);
    }

    /// End to end through the production gateway with a scripted model
    #[tokio::test]
    async fn test_prompt_reaches_model_without_history() {
        struct Scripted(Mutex<Vec<LlmRequest>>);

        #[async_trait]
        impl LlmService for Scripted {
            async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
                self.0.lock().unwrap().push(request.clone());
                Ok(LlmResponse::from_text("Please upload a file first"))
            }

            fn model_id(&self) -> &str {
                "scripted"
            }
        }

        let model = Arc::new(Scripted(Mutex::new(Vec::new())));
        let handle = start(LlmGateway::new(model.clone()));

        handle.submit("What's the total revenue?").await.unwrap();
        settle(&handle).await;
        handle.submit("And last month?").await.unwrap();
        let done = settle(&handle).await;
        assert_eq!(done.messages.len(), 4);

        let requests = model.0.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for request in &*requests {
            assert_eq!(request.messages.len(), 1);
            assert!(request.messages[0].text.contains("Politely ask them to upload"));
        }
        assert!(requests[1].messages[0].text.contains("And last month?"));
        assert!(!requests[1].messages[0].text.contains("total revenue"));
    }
}
