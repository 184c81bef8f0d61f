//! Completion gateway: one stateless question/answer call per submission

mod prompt;

pub use prompt::{build_content, SYSTEM_INSTRUCTION};

use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::runtime::CompletionGateway;
use crate::state_machine::Attachment;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Any failure of the completion call. Callers never branch on the cause.
#[derive(Debug, Clone, Error)]
#[error("completion failed: {source}")]
pub struct GatewayError {
    #[from]
    source: LlmError,
}

impl GatewayError {
    /// Underlying provider error, for diagnostics only
    pub fn detail(&self) -> &LlmError {
        &self.source
    }
}

/// Production gateway backed by an [`LlmService`]
pub struct LlmGateway {
    service: Arc<dyn LlmService>,
}

impl LlmGateway {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompletionGateway for LlmGateway {
    async fn complete(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError> {
        let request = LlmRequest::single_turn(SYSTEM_INSTRUCTION, build_content(question, attachment));

        tracing::debug!(
            model = %self.service.model_id(),
            attachment = attachment.map(|a| a.name.as_str()),
            "Requesting completion"
        );

        let response = self.service.complete(&request).await?;
        Ok(response.text)
    }
}
