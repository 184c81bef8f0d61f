//! API request and response types

use crate::state_machine::{Attachment, ConvState, Message};
use serde::{Deserialize, Serialize};

/// Request to replace the draft
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Request to submit a question. Without `text` the stored draft is used.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Request to attach a picked file
#[derive(Debug, Deserialize)]
pub struct AttachRequest {
    pub name: String,
}

/// Everything the page needs to render
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub messages: Vec<Message>,
    pub draft: String,
    pub attachment: Option<Attachment>,
    pub busy: bool,
    pub can_submit: bool,
    pub placeholder: String,
}

impl From<ConvState> for StateResponse {
    fn from(state: ConvState) -> Self {
        let can_submit = state.can_submit();
        let placeholder = state.placeholder();
        Self {
            messages: state.messages,
            draft: state.draft,
            attachment: state.attachment,
            busy: state.busy,
            can_submit,
            placeholder,
        }
    }
}

/// Version information
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
