//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state
//! and effect list (message ids and timestamps aside). No I/O happens here.

use super::state::{ConvState, Message, GATEWAY_FAILURE_TEXT};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Intents the state machine refuses. Refusal leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A request is already in progress")]
    Busy,
    #[error("Message is empty")]
    EmptyDraft,
    #[error("No completion request is outstanding")]
    NoRequestInFlight,
}

pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::UpdateDraft { text } => {
            let new_state = ConvState {
                draft: text.clone(),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effect(Effect::notify_draft(text)))
        }

        Event::Submit { .. } if state.busy => Err(TransitionError::Busy),

        Event::Submit { text } if text.trim().is_empty() => Err(TransitionError::EmptyDraft),

        Event::Submit { text } => {
            let message = Message::user(text.clone());
            let mut new_state = state.clone();
            new_state.messages.push(message.clone());
            new_state.draft.clear();
            new_state.busy = true;

            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::notify_message(message))
                .with_effect(Effect::notify_draft(""))
                .with_effect(Effect::notify_busy(true))
                .with_effect(Effect::RequestCompletion {
                    question: text,
                    attachment: state.attachment.clone(),
                }))
        }

        Event::AttachFile { attachment } => {
            let messages = attachment.notices().to_vec();
            let new_state = ConvState {
                messages: messages.clone(),
                attachment: Some(attachment.clone()),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::notify_reset(Some(attachment), messages)))
        }

        Event::ClearAttachment => {
            let new_state = ConvState {
                messages: Vec::new(),
                attachment: None,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effect(Effect::notify_reset(None, Vec::new())))
        }

        Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. } if !state.busy => {
            Err(TransitionError::NoRequestInFlight)
        }

        Event::CompletionSucceeded { text } => Ok(settle(state, Message::model(text))),

        Event::CompletionFailed { .. } => Ok(settle(state, Message::system(GATEWAY_FAILURE_TEXT))),
    }
}

/// Append the outcome of the outstanding request and clear the busy flag
fn settle(state: &ConvState, outcome: Message) -> TransitionResult {
    let mut new_state = state.clone();
    new_state.messages.push(outcome.clone());
    new_state.busy = false;

    TransitionResult::new(new_state)
        .with_effect(Effect::notify_message(outcome))
        .with_effect(Effect::notify_busy(false))
}
