pub mod api;
pub mod config;
pub mod controller;
pub mod environment;
pub mod error;
pub mod state;

// Re-export main types for convenience
pub use api::{ChatResponse, RailAdviceClient};
pub use config::Config;
pub use controller::{ChatController, View};
pub use environment::Environment;
pub use error::{ChatError, ErrorKind};
pub use state::{ChatMessage, ChatRole, ConnectionStatus, StatusIndicator};
