//! Conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extensions the file picker accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// Shown in place of a model reply when the completion call fails
pub const GATEWAY_FAILURE_TEXT: &str =
    "Sorry, something went wrong. Please check your connection or API key and try again.";

/// Second notice after a file is attached
pub const USAGE_HINT: &str =
    r#"You can now ask questions like "What's the total revenue?" or "How many orders are pending?""#;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Model,
    System,
}

/// A single chat entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Author::Model, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Author::System, text)
    }
}

/// Why a file name was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("file name is empty")]
    EmptyName,
    #[error("unsupported file type {0:?}; expected one of .xlsx, .xls, .csv")]
    UnsupportedExtension(String),
}

/// Name-only reference to the user's file. Content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validate a picked file name against the accepted spreadsheet types.
    ///
    /// Matches the picker's suffix rule, so a bare ".csv" is accepted. The
    /// name is kept exactly as picked.
    pub fn from_file_name(name: &str) -> Result<Self, AttachmentError> {
        if name.trim().is_empty() {
            return Err(AttachmentError::EmptyName);
        }

        let accepted = name
            .trim_end()
            .rsplit_once('.')
            .is_some_and(|(_, ext)| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            });

        if accepted {
            Ok(Self::new(name))
        } else {
            Err(AttachmentError::UnsupportedExtension(name.to_string()))
        }
    }

    /// The two notices that open a fresh conversation about this file
    pub fn notices(&self) -> [Message; 2] {
        [
            Message::system(format!("File \"{}\" uploaded successfully.", self.name)),
            Message::system(USAGE_HINT),
        ]
    }
}

/// Complete conversation state owned by the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvState {
    pub messages: Vec<Message>,
    pub draft: String,
    pub attachment: Option<Attachment>,
    /// True exactly while a completion request is outstanding
    pub busy: bool,
}

impl ConvState {
    /// Whether a submit of the current draft would be accepted
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }

    /// Input hint for the presentation layer
    pub fn placeholder(&self) -> String {
        match &self.attachment {
            Some(file) => format!("Ask about {}...", file.name),
            None => "Upload a file to start...".to_string(),
        }
    }
}
