//! HTTP API for the chat page

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::ConversationHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversation: ConversationHandle,
    pub model_id: String,
}

impl AppState {
    pub fn new(conversation: ConversationHandle, model_id: impl Into<String>) -> Self {
        Self {
            conversation,
            model_id: model_id.into(),
        }
    }
}
