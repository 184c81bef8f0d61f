//! Prompt construction for spreadsheet questions
//!
//! The model never sees the file. Context comes from the fixed persona, a
//! hint derived from the attachment name, and the latest question only.

use crate::state_machine::Attachment;

/// Persona sent as the system instruction on every request
pub const SYSTEM_INSTRUCTION: &str = r#"You are "business53", an expert AI assistant that analyzes business data from uploaded spreadsheets. Your tone is professional, insightful, and helpful."#;

const NO_FILE_HINT: &str = "The user has not uploaded a file. Politely ask them to upload an Excel or Tally sheet to get started with data analysis.";

/// Build the content string for one question
pub fn build_content(question: &str, attachment: Option<&Attachment>) -> String {
    let mut content = match attachment {
        Some(file) => format!(
            "The user has uploaded a file named \"{}\". Assume this file contains columns for 'Product', 'Status', 'Revenue', 'Order ID', 'Date', etc. Based on the likely contents of this file, answer the user's question concisely.",
            file.name
        ),
        None => NO_FILE_HINT.to_string(),
    };
    content.push_str("\n\nUser's question: \"");
    content.push_str(question);
    content.push('"');
    content
}
