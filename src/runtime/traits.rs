//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::gateway::GatewayError;
use crate::state_machine::Attachment;
use async_trait::async_trait;
use std::sync::Arc;

/// Boundary to the external text-generation service
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Answer one question. Stateless: no prior turns are involved.
    async fn complete(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: CompletionGateway + ?Sized> CompletionGateway for Arc<T> {
    async fn complete(
        &self,
        question: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError> {
        (**self).complete(question, attachment).await
    }
}
