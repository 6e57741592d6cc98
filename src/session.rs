use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::commands::{parse_slash_command, CommandAction, ExchangeSpec, ParsedCommand};
use crate::composer::compose;
use crate::events::{ConversationState, EventKind, InboundEvent, Turn};
use crate::host::MessagingHost;
use crate::llm::{CompletionRequest, CompletionService};
use crate::prompts;
use crate::storage::StateStore;

/// Outcome of one completion exchange
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExchangeReply {
    /// The service answered (possibly with the empty-completion stand-in)
    Completed(String),
    /// The service failed; carries the apology that was recorded
    Fallback(String),
}

impl ExchangeReply {
    fn text(&self) -> &str {
        match self {
            ExchangeReply::Completed(text) | ExchangeReply::Fallback(text) => text,
        }
    }
}

/// Text to send for an exchange. `None` means state could not be loaded.
fn reply_text(reply: Option<ExchangeReply>, spec: Option<&ExchangeSpec>) -> String {
    match (reply, spec) {
        (Some(ExchangeReply::Completed(text)), Some(spec)) => spec.labeled(&text),
        (Some(ExchangeReply::Completed(text)), None) => text,
        // The apology goes out unlabeled so the reply matches the stored turn.
        (Some(ExchangeReply::Fallback(text)), _) => text,
        (None, _) => prompts::STATE_UNAVAILABLE_REPLY.to_string(),
    }
}

/// Routes inbound events for every conversation and owns the exchange policy.
///
/// Events for one conversation are expected one at a time; events for
/// different conversations may be handled concurrently.
#[derive(Clone)]
pub struct SessionManager {
    completion: Arc<dyn CompletionService>,
    store: Arc<dyn StateStore>,
    host: Arc<dyn MessagingHost>,
}

impl SessionManager {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        store: Arc<dyn StateStore>,
        host: Arc<dyn MessagingHost>,
    ) -> Self {
        Self {
            completion,
            store,
            host,
        }
    }

    /// Handle one inbound event and send exactly one reply.
    ///
    /// Never fails: per-message errors are logged and turned into a reply.
    #[tracing::instrument(
        skip_all,
        fields(conversation_id = %event.conversation_id, event_id = %event.id)
    )]
    pub async fn handle_event(&self, event: InboundEvent) {
        let reply = match &event.kind {
            EventKind::MemberAdded => {
                info!("member added, sending welcome");
                prompts::WELCOME_MESSAGE.to_string()
            }
            EventKind::Message { text } => {
                self.handle_message(&event.conversation_id, text.as_deref().unwrap_or_default())
                    .await
            }
        };

        if let Err(err) = self.host.send_text(&event.conversation_id, &reply).await {
            error!(error = %err, "failed to send reply");
        }
    }

    async fn handle_message(&self, conversation_id: &str, text: &str) -> String {
        match parse_slash_command(text) {
            Some(parsed) => {
                debug!(command = parsed.command.command(), "dispatching command");
                self.run_command(conversation_id, parsed).await
            }
            None => self.handle_generic(conversation_id, text).await,
        }
    }

    async fn run_command(&self, conversation_id: &str, parsed: ParsedCommand) -> String {
        match parsed.command.action() {
            CommandAction::Reply(text) => text.to_string(),
            CommandAction::Exchange(spec) => match parsed.argument() {
                None => spec.missing_argument.to_string(),
                Some(argument) => {
                    let reply = self.exchange(conversation_id, (spec.template)(argument)).await;
                    reply_text(reply, Some(&spec))
                }
            },
            CommandAction::Clear => self.clear(conversation_id).await,
            CommandAction::Reset => self.reset(conversation_id).await,
        }
    }

    async fn handle_generic(&self, conversation_id: &str, text: &str) -> String {
        let message = text.trim();
        if message.is_empty() {
            debug!("empty message ignored");
            return prompts::EMPTY_MESSAGE_REPLY.to_string();
        }

        let reply = self.exchange(conversation_id, message.to_string()).await;
        reply_text(reply, None)
    }

    /// Run one user/assistant exchange and record both turns.
    ///
    /// Returns `None` without calling the service when state cannot be loaded.
    async fn exchange(&self, conversation_id: &str, content: String) -> Option<ExchangeReply> {
        let mut state = match self.store.load(conversation_id).await {
            Ok(state) => state,
            Err(err) => {
                error!(error = %err, "failed to load conversation state");
                return None;
            }
        };

        state.push_turn(Turn::user(content.clone()));
        let messages = compose(prompts::SYSTEM_PROMPT, &state.history, &content);

        let reply = match self.completion.complete(CompletionRequest::new(messages)).await {
            Ok(Some(text)) => ExchangeReply::Completed(text),
            Ok(None) => {
                warn!("completion returned no text");
                ExchangeReply::Completed(prompts::EMPTY_COMPLETION_REPLY.to_string())
            }
            Err(err) => {
                error!(error = %err, "completion request failed");
                ExchangeReply::Fallback(prompts::APOLOGY_REPLY.to_string())
            }
        };

        state.push_turn(Turn::assistant(reply.text()));
        state.message_count += 1;

        if let Err(err) = self.store.save(conversation_id, &state).await {
            error!(error = %err, "failed to save conversation state");
        }
        debug!(
            turns = state.history.len(),
            message_count = state.message_count,
            "exchange recorded"
        );

        Some(reply)
    }

    async fn clear(&self, conversation_id: &str) -> String {
        match self.store.delete_all(conversation_id).await {
            Ok(()) => {
                info!("conversation state cleared");
                prompts::CLEAR_CONFIRMATION.to_string()
            }
            Err(err) => {
                error!(error = %err, "failed to clear conversation state");
                prompts::STATE_UNAVAILABLE_REPLY.to_string()
            }
        }
    }

    async fn reset(&self, conversation_id: &str) -> String {
        let result = async {
            let mut state: ConversationState = self.store.load(conversation_id).await?;
            state.history.clear();
            self.store.save(conversation_id, &state).await
        }
        .await;

        match result {
            Ok(()) => {
                info!("conversation history reset");
                prompts::RESET_CONFIRMATION.to_string()
            }
            Err(err) => {
                error!(error = %err, "failed to reset conversation history");
                prompts::STATE_UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}
