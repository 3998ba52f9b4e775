// src/client/session.rs
use tracing::{debug, warn};

use super::conversation::{Conversation, Message};
use super::relay_api::{RelayApi, RelayClientError};
use super::storage::ConversationStore;

/// Shown as the assistant reply whenever the relay call fails.
pub const FALLBACK_REPLY: &str = "Something went wrong.";

/// Model the client asks the relay for unless told otherwise.
pub const DEFAULT_CLIENT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Empty input, or a request was already in flight.
    Ignored,
    Replied,
    Failed,
}

pub struct ChatSession<S, R> {
    conversation: Conversation,
    store: S,
    relay: R,
    model: Option<String>,
    input: String,
    loading: bool,
}

impl<S: ConversationStore, R: RelayApi> ChatSession<S, R> {
    /// Restores the conversation from `store`. An unreadable entry is logged
    /// and replaced by an empty conversation.
    pub fn open(store: S, relay: R, model: Option<String>) -> Self {
        let conversation = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable chat history");
            Conversation::new()
        });
        debug!(messages = conversation.len(), "chat history restored");

        Self {
            conversation,
            store,
            relay,
            model,
            input: String::new(),
            loading: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validates the pending input and records it as a user message.
    /// Returns the prompt to send, or `None` when nothing should be sent.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.loading || self.input.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.input);
        self.conversation.push(Message::user(prompt.clone()));
        self.loading = true;
        self.persist();
        Some(prompt)
    }

    /// Records the outcome of the relay call started by [`Self::begin_submit`].
    pub fn complete(&mut self, result: Result<String, RelayClientError>) -> Submission {
        let outcome = match result {
            Ok(reply) => {
                self.conversation.push(Message::assistant(reply));
                Submission::Replied
            }
            Err(err) => {
                warn!(error = %err, "relay call failed");
                self.conversation.push(Message::assistant(FALLBACK_REPLY));
                Submission::Failed
            }
        };
        self.loading = false;
        self.persist();
        outcome
    }

    /// Sends `prompt` to the relay with the session's model.
    pub async fn send(&self, prompt: &str) -> Result<String, RelayClientError> {
        self.relay.generate(prompt, self.model.as_deref()).await
    }

    pub async fn submit(&mut self) -> Submission {
        let Some(prompt) = self.begin_submit() else {
            return Submission::Ignored;
        };
        let result = self.send(&prompt).await;
        self.complete(result)
    }

    /// Starts a new chat: forgets the conversation here and in storage.
    pub fn reset(&mut self) {
        self.conversation.clear();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored chat history");
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.conversation) {
            warn!(error = %err, "failed to save chat history");
        }
    }
}
