//! Runtime for the conversation store
//!
//! Owns the single conversation, feeds intents through the state machine,
//! runs completion requests, and fans out change notifications.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::state_machine::{Attachment, ConvState, Event, Notification, TransitionError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 32;
const BROADCAST_BUFFER: usize = 128;

/// An event plus an optional channel for the transition outcome
#[derive(Debug)]
pub struct Command {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<ConvState, TransitionError>>>,
}

impl Command {
    /// Event raised by the runtime itself; nobody waits on it
    pub fn internal(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init { state: ConvState },
    Notification(Notification),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Refused(#[from] TransitionError),
    #[error("conversation runtime has stopped")]
    Stopped,
}

/// Handle to interact with the running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    state_rx: watch::Receiver<ConvState>,
}

impl ConversationHandle {
    /// Send an event and wait until the runtime has applied or refused it.
    /// Returns the state right after the transition.
    pub async fn dispatch(&self, event: Event) -> Result<ConvState, StoreError> {
        let (reply, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| StoreError::Stopped)?;

        Ok(reply_rx.await.map_err(|_| StoreError::Stopped)??)
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<ConvState, StoreError> {
        self.dispatch(Event::Submit { text: text.into() }).await
    }

    pub async fn attach_file(&self, attachment: Attachment) -> Result<ConvState, StoreError> {
        self.dispatch(Event::AttachFile { attachment }).await
    }

    pub async fn clear_attachment(&self) -> Result<ConvState, StoreError> {
        self.dispatch(Event::ClearAttachment).await
    }

    pub async fn update_draft(&self, text: impl Into<String>) -> Result<ConvState, StoreError> {
        self.dispatch(Event::UpdateDraft { text: text.into() }).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> ConvState {
        self.state_rx.borrow().clone()
    }

    /// Snapshot plus a receiver for every later change. A change racing this
    /// call can show up in both; message ids make repeats detectable.
    pub fn subscribe(&self) -> (ConvState, broadcast::Receiver<SseEvent>) {
        let rx = self.broadcast_tx.subscribe();
        (self.snapshot(), rx)
    }

    /// Wait until no completion request is outstanding
    #[cfg(test)]
    pub async fn wait_idle(&self) -> Result<ConvState, StoreError> {
        let mut state_rx = self.state_rx.clone();
        let state = state_rx
            .wait_for(|state| !state.busy)
            .await
            .map_err(|_| StoreError::Stopped)?;
        Ok(state.clone())
    }
}

/// Spawn the conversation runtime on the current tokio runtime
pub fn start<G>(gateway: G) -> ConversationHandle
where
    G: CompletionGateway + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (broadcast_tx, _) = broadcast::channel(BROADCAST_BUFFER);
    let (state_tx, state_rx) = watch::channel(ConvState::default());

    let runtime = ConversationRuntime::new(
        Arc::new(gateway),
        command_rx,
        command_tx.downgrade(),
        broadcast_tx.clone(),
        state_tx,
    );
    tokio::spawn(runtime.run());

    ConversationHandle {
        command_tx,
        broadcast_tx,
        state_rx,
    }
}
