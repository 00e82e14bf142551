//! Chat controller
//!
//! Owns everything a front-end displays: which view is active, the message
//! log, the typing indicator and the connection status. Network calls are
//! split into a `begin_*` step that updates the UI state and a `complete_*`
//! step that applies the result, so a front-end can run the request on a
//! background task and feed the outcome back whenever it arrives.

use tracing::{error, info, warn};

use crate::api::{ChatResponse, RailAdviceClient};
use crate::error::ChatError;
use crate::state::{
    ChatMessage, ConnectionStatus, StatusIndicator, LABEL_ASKING, LABEL_CONNECTED,
    LABEL_CONNECTING, LABEL_DISCONNECTED, LABEL_FAILED,
};

/// Shown when the service answers with an empty response
pub const EMPTY_REPLY: &str = "Beklager, jeg kunne ikke generere et svar.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Initial,
    Chat,
}

#[derive(Debug, Default)]
pub struct ChatController {
    view: View,
    messages: Vec<ChatMessage>,
    typing: bool,
    pending: usize,
    status: StatusIndicator,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_chat_active(&self) -> bool {
        self.view == View::Chat
    }

    /// Switch from the landing view to the chat view. Returns false when the
    /// chat view was already active.
    pub fn enter_chat_mode(&mut self) -> bool {
        if self.view == View::Chat {
            return false;
        }
        self.view = View::Chat;
        true
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn show_typing(&mut self) {
        self.typing = true;
    }

    pub fn hide_typing(&mut self) {
        self.typing = false;
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Requests sent but not yet completed
    pub fn pending_requests(&self) -> usize {
        self.pending
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    fn set_status(&mut self, status: ConnectionStatus, label: &str) {
        self.status = StatusIndicator::new(status, label);
    }

    /// Submit a prompt from the landing view: enters chat mode and sends it.
    /// Blank prompts leave the view untouched.
    pub fn start_chat(&mut self, prompt: &str) -> Option<String> {
        if prompt.trim().is_empty() {
            return None;
        }
        self.enter_chat_mode();
        self.begin_send(prompt)
    }

    /// Render the user's message and mark a request as in flight. Returns the
    /// trimmed text to post, or `None` when there is nothing to send.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.append(ChatMessage::user(text));
        self.show_typing();
        self.pending += 1;
        self.set_status(ConnectionStatus::Connecting, LABEL_ASKING);
        Some(text.to_string())
    }

    /// Apply the outcome of one chat request.
    pub fn complete_send(&mut self, result: Result<ChatResponse, ChatError>) {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.hide_typing();
        }

        match result {
            Ok(response) => {
                self.set_status(ConnectionStatus::Connected, LABEL_CONNECTED);
                self.append(ChatMessage::assistant(format_reply(&response)));
            }
            Err(err) => {
                error!(kind = ?err.kind(), "chat request failed: {}", err);
                self.set_status(ConnectionStatus::Error, LABEL_FAILED);
                self.append(ChatMessage::assistant(err.diagnostic()));
            }
        }
    }

    pub fn begin_health_check(&mut self) {
        self.set_status(ConnectionStatus::Connecting, LABEL_CONNECTING);
    }

    pub fn complete_health_check(&mut self, result: Result<(), ChatError>) {
        match result {
            Ok(()) => {
                info!("backend health check passed");
                self.set_status(ConnectionStatus::Connected, LABEL_CONNECTED);
            }
            Err(err) => {
                warn!("backend health check failed: {}", err);
                self.set_status(ConnectionStatus::Error, LABEL_DISCONNECTED);
            }
        }
    }

    /// Send one message and wait for the reply.
    pub async fn send(&mut self, client: &RailAdviceClient, text: &str) {
        if let Some(message) = self.begin_send(text) {
            let result = client.chat(&message).await;
            self.complete_send(result);
        }
    }

    pub async fn check_health(&mut self, client: &RailAdviceClient) {
        self.begin_health_check();
        let result = client.health().await;
        self.complete_health_check(result);
    }
}

/// Assistant bubble text for a successful response, with a source footer
/// when the answer cites any documents.
pub fn format_reply(response: &ChatResponse) -> String {
    let mut reply = match response.response.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_REPLY.to_string(),
    };

    if let Some(sources) = response.sources.filter(|n| *n > 0.0) {
        let noun = if sources == 1.0 { "dokument" } else { "dokumenter" };
        reply.push_str(&format!("\n\n📚 Basert på {} {}", sources, noun));
        if let Some(confidence) = &response.confidence {
            reply.push_str(&format!(" ({} sikkerhet)", confidence));
        }
    }

    reply
}
