//! Events that can occur in a conversation

use super::state::Attachment;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    UpdateDraft {
        text: String,
    },
    Submit {
        text: String,
    },
    AttachFile {
        attachment: Attachment,
    },
    ClearAttachment,

    // Completion outcomes
    CompletionSucceeded {
        text: String,
    },
    CompletionFailed {
        /// Diagnostic detail; never shown to the user
        reason: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UpdateDraft { .. } => "update_draft",
            Event::Submit { .. } => "submit",
            Event::AttachFile { .. } => "attach_file",
            Event::ClearAttachment => "clear_attachment",
            Event::CompletionSucceeded { .. } => "completion_succeeded",
            Event::CompletionFailed { .. } => "completion_failed",
        }
    }
}
