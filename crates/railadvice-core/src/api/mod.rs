pub mod railadvice;

pub use railadvice::{ChatRequest, ChatResponse, RailAdviceClient, CHAT_CONTEXT};
