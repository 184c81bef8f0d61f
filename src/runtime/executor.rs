//! Conversation runtime executor

use super::traits::CompletionGateway;
use super::{Command, SseEvent};
use crate::state_machine::{transition, Attachment, ConvState, Effect, Event, TransitionError};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Single actor that owns the conversation state.
///
/// Commands are handled one at a time. Completion calls run on spawned tasks
/// and report back through the same command channel, so state is only ever
/// touched from `run`.
pub struct ConversationRuntime<G>
where
    G: CompletionGateway + 'static,
{
    state: ConvState,
    gateway: Arc<G>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so that dropping every handle stops the runtime
    command_tx: mpsc::WeakSender<Command>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    state_tx: watch::Sender<ConvState>,
}

impl<G> ConversationRuntime<G>
where
    G: CompletionGateway + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        state_tx: watch::Sender<ConvState>,
    ) -> Self {
        let state = state_tx.borrow().clone();
        Self {
            state,
            gateway,
            command_rx,
            command_tx,
            broadcast_tx,
            state_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting conversation runtime");

        while let Some(Command { event, reply }) = self.command_rx.recv().await {
            let result = self.process_event(event);
            if let Some(reply) = reply {
                let _ = reply.send(result.map(|()| self.state.clone()));
            }
        }

        tracing::info!("Conversation runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let name = event.name();
        if let Event::CompletionFailed { reason } = &event {
            tracing::warn!(reason = %reason, "Completion failed; user sees the fixed apology");
        }

        // Pure state transition
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(event = name, reason = %e, "Event refused");
                return Err(e);
            }
        };

        self.state = result.new_state;
        self.state_tx.send_replace(self.state.clone());

        tracing::debug!(
            event = name,
            messages = self.state.messages.len(),
            busy = self.state.busy,
            "Event applied"
        );

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::RequestCompletion {
                question,
                attachment,
            } => self.spawn_completion(question, attachment),
            Effect::Notify(notification) => {
                // No subscribers is fine
                let _ = self.broadcast_tx.send(SseEvent::Notification(notification));
            }
        }
    }

    fn spawn_completion(&self, question: String, attachment: Option<Attachment>) {
        let gateway = Arc::clone(&self.gateway);
        let command_tx = self.command_tx.clone();

        tokio::spawn(async move {
            let event = match gateway.complete(&question, attachment.as_ref()).await {
                Ok(text) => Event::CompletionSucceeded { text },
                Err(e) => Event::CompletionFailed {
                    reason: e.detail().message.clone(),
                },
            };

            let Some(tx) = command_tx.upgrade() else {
                tracing::warn!("Runtime gone before completion settled; dropping outcome");
                return;
            };
            if tx.send(Command::internal(event)).await.is_err() {
                tracing::warn!("Runtime stopped before completion settled; dropping outcome");
            }
        });
    }
}
