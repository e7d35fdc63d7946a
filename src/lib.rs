pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod ui;

pub use api::{ChatApi, HttpChatApi};
pub use chat::{ChatManager, Notice, NoticeLevel};
pub use config::Config;
pub use error::ChatError;
pub use store::ConversationStore;
pub use types::{Conversation, Message, Sender};
