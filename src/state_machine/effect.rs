//! Effects produced by state transitions

use super::state::{Attachment, Message};
use serde::Serialize;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the completion gateway about `question`
    RequestCompletion {
        question: String,
        attachment: Option<Attachment>,
    },

    /// Notify connected clients
    Notify(Notification),
}

/// Change notifications pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Message {
        message: Message,
    },
    Reset {
        attachment: Option<Attachment>,
        messages: Vec<Message>,
    },
    Busy {
        busy: bool,
    },
    Draft {
        draft: String,
    },
}

impl Notification {
    pub fn event_type(&self) -> &'static str {
        match self {
            Notification::Message { .. } => "message",
            Notification::Reset { .. } => "reset",
            Notification::Busy { .. } => "busy",
            Notification::Draft { .. } => "draft",
        }
    }
}

impl Effect {
    pub fn notify_message(message: Message) -> Self {
        Effect::Notify(Notification::Message { message })
    }

    pub fn notify_reset(attachment: Option<Attachment>, messages: Vec<Message>) -> Self {
        Effect::Notify(Notification::Reset {
            attachment,
            messages,
        })
    }

    pub fn notify_busy(busy: bool) -> Self {
        Effect::Notify(Notification::Busy { busy })
    }

    pub fn notify_draft(draft: impl Into<String>) -> Self {
        Effect::Notify(Notification::Draft {
            draft: draft.into(),
        })
    }
}
