//! Code helper chat bot: slash-command routing and a bounded rolling
//! conversation context in front of a chat-completion service.

pub mod commands;
pub mod composer;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod storage;

pub use events::{ConversationState, EventKind, InboundEvent, Role, Turn};
pub use session::SessionManager;
