pub mod conversation;
pub mod rest;

pub use conversation::{ConversationEntry, ConversationLog};
pub use rest::{AppState, RestApi};
