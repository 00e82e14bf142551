//! UI-agnostic chat state types
//!
//! These types are shared by every front-end and don't depend on any
//! specific UI framework.

use serde::{Deserialize, Serialize};

/// A single bubble in the chat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Outcome of the most recent network attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error,
}

pub const LABEL_CONNECTING: &str = "Kobler til...";
pub const LABEL_ASKING: &str = "Spør AI...";
pub const LABEL_CONNECTED: &str = "Tilkoblet";
pub const LABEL_DISCONNECTED: &str = "Frakoblet";
pub const LABEL_FAILED: &str = "Feil";

/// Status dot plus the label shown next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub status: ConnectionStatus,
    pub label: String,
}

impl StatusIndicator {
    pub fn new(status: ConnectionStatus, label: &str) -> Self {
        Self {
            status,
            label: label.to_string(),
        }
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(ConnectionStatus::Connecting, LABEL_CONNECTING)
    }
}
