//! Sync operations: list, create, and send against the remote service,
//! keeping the conversation store consistent with server state.

use std::collections::VecDeque;

use log::{error, warn};

use crate::api::ChatApi;
use crate::error::{ChatError, Result};
use crate::store::ConversationStore;
use crate::types::{Conversation, Message, conversations_from_payload};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient notification for the presentation layer to display.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub detail: String,
    pub level: NoticeLevel,
}

/// Drives the three sync operations and owns the conversation store.
///
/// Every failure is caught here and surfaced as a notice; the only error a
/// caller sees is `Busy`, when it tries to start an operation while one is
/// already in flight.
pub struct ChatManager<A: ChatApi> {
    api: A,
    store: ConversationStore,
    notices: VecDeque<Notice>,
}

impl<A: ChatApi> ChatManager<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: ConversationStore::new(),
            notices: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.store.select(id);
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.store.current()
    }

    pub fn is_busy(&self) -> bool {
        self.store.is_busy()
    }

    /// Pop the oldest pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Fetch all conversations and replace the store with the server's
    /// canonical state. On failure the store degrades to an empty list
    /// rather than keeping stale or partial data.
    pub async fn refresh(&mut self) {
        match self.fetch_conversations().await {
            Ok(Some(conversations)) => self.store.replace_all(conversations),
            Ok(None) => {
                warn!("list payload is not a sequence; treating as empty");
                self.store.replace_all(Vec::new());
            }
            Err(e) => {
                error!("failed to fetch conversations: {}", e);
                self.store.replace_all(Vec::new());
                self.notify_error("Error", "Could not load conversations");
            }
        }
    }

    async fn fetch_conversations(&self) -> Result<Option<Vec<Conversation>>> {
        let payload = self.api.list().await?;
        Ok(conversations_from_payload(payload)?)
    }

    /// Create a conversation on the server, select it, and refresh.
    pub async fn create_conversation(&mut self) -> Result<Option<String>> {
        if !self.store.try_begin() {
            return Err(ChatError::Busy);
        }

        let outcome = match self.api.create().await {
            Ok(id) => {
                self.store.select(id.clone());
                self.refresh().await;
                self.notify_info("Success", "New conversation created");
                Some(id)
            }
            Err(e) => {
                error!("failed to create conversation: {}", e);
                self.notify_error("Error", "Could not create a new conversation");
                None
            }
        };

        self.store.finish();
        Ok(outcome)
    }

    /// Send a message: append it optimistically, round-trip to the server,
    /// then refresh so the store matches the authoritative history. On
    /// failure the optimistic message is rolled back.
    ///
    /// Whitespace-only input is a no-op and does not touch the network.
    pub async fn send_message(&mut self, message: &str, chat_id: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Ok(());
        }

        if !self.store.try_begin() {
            return Err(ChatError::Busy);
        }

        // The optimistic append happens before the network call so the UI
        // reflects the send immediately.
        self.store
            .append_message(chat_id, Message::local_user(message.to_string()));

        match self.api.send(chat_id, message).await {
            Ok(reply) => {
                self.store.append_message(chat_id, Message::from_reply(reply));
                self.refresh().await;
            }
            Err(e) => {
                error!("failed to send message: {}", e);
                self.notify_error("Error", "Could not send the message");
                self.store.remove_last_message(chat_id);
            }
        }

        self.store.finish();
        Ok(())
    }

    fn notify_info(&mut self, title: &str, detail: &str) {
        self.notices.push_back(Notice {
            title: title.to_string(),
            detail: detail.to_string(),
            level: NoticeLevel::Info,
        });
    }

    fn notify_error(&mut self, title: &str, detail: &str) {
        self.notices.push_back(Notice {
            title: title.to_string(),
            detail: detail.to_string(),
            level: NoticeLevel::Error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Scripted stand-in for the remote service.
    struct MockApi {
        list_payload: Mutex<Value>,
        create_response: Option<String>,
        send_response: Option<String>,
    }

    impl MockApi {
        fn new(list_payload: Value) -> Self {
            Self {
                list_payload: Mutex::new(list_payload),
                create_response: None,
                send_response: None,
            }
        }

        fn with_send(mut self, reply: &str) -> Self {
            self.send_response = Some(reply.to_string());
            self
        }

        fn with_create(mut self, id: &str) -> Self {
            self.create_response = Some(id.to_string());
            self
        }

        fn failure() -> ChatError {
            ChatError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }

    impl ChatApi for MockApi {
        async fn list(&self) -> crate::error::Result<Value> {
            Ok(self.list_payload.lock().unwrap().clone())
        }

        async fn create(&self) -> crate::error::Result<String> {
            self.create_response.clone().ok_or_else(Self::failure)
        }

        async fn send(&self, _chat_id: &str, _message: &str) -> crate::error::Result<String> {
            self.send_response.clone().ok_or_else(Self::failure)
        }
    }

    fn empty_conversation_payload(id: &str) -> Value {
        json!({ "data": [{ "_id": id, "chat": [] }] })
    }

    #[tokio::test]
    async fn send_appends_user_and_assistant_then_reconciles() {
        let api = MockApi::new(empty_conversation_payload("c1")).with_send("hi there");
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        // The mock list keeps returning an empty history, so freeze it to
        // the optimistic view by swapping the payload after the send.
        *manager.api.list_payload.lock().unwrap() = json!({ "data": [{
            "_id": "c1",
            "chat": [
                { "text": "hello", "from": "user" },
                { "text": "hi there", "from": "assistant" }
            ]
        }] });

        manager.send_message("hello", "c1").await.unwrap();

        let conv = &manager.store().conversations()[0];
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].content, "hello");
        assert_eq!(conv.messages[0].sender, crate::types::Sender::User);
        assert_eq!(conv.messages[1].content, "hi there");
        assert_eq!(conv.messages[1].sender, crate::types::Sender::Assistant);
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn failed_send_rolls_back_optimistic_message() {
        let api = MockApi::new(empty_conversation_payload("c1"));
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        manager.send_message("hello", "c1").await.unwrap();

        let conv = &manager.store().conversations()[0];
        assert!(conv.messages.is_empty());
        assert!(!manager.is_busy());

        let notice = manager.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn whitespace_send_is_a_noop() {
        let api = MockApi::new(empty_conversation_payload("c1")).with_send("unused");
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        manager.send_message("   \n", "c1").await.unwrap();

        assert!(manager.store().conversations()[0].messages.is_empty());
        assert!(manager.take_notice().is_none());
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn non_sequence_list_payload_degrades_to_empty() {
        let api = MockApi::new(json!({ "data": { "unexpected": true } }));
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        assert!(manager.store().conversations().is_empty());
        // The fail-soft path logs a warning but raises no error notice.
        assert!(manager.take_notice().is_none());
    }

    #[tokio::test]
    async fn create_selects_new_conversation() {
        let api = MockApi::new(empty_conversation_payload("c9")).with_create("c9");
        let mut manager = ChatManager::new(api);

        let id = manager.create_conversation().await.unwrap();

        assert_eq!(id.as_deref(), Some("c9"));
        assert_eq!(manager.current().unwrap().id, "c9");
        let notice = manager.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn failed_create_leaves_state_untouched() {
        let api = MockApi::new(empty_conversation_payload("c1"));
        let mut manager = ChatManager::new(api);
        manager.refresh().await;
        manager.select("c1");

        let id = manager.create_conversation().await.unwrap();

        assert!(id.is_none());
        assert_eq!(manager.current().unwrap().id, "c1");
        assert_eq!(manager.take_notice().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn overlapping_operations_are_rejected() {
        let api = MockApi::new(empty_conversation_payload("c1")).with_send("ok");
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        // Claim the slot by hand to simulate an operation in flight.
        assert!(manager.store.try_begin());

        assert!(matches!(
            manager.send_message("hello", "c1").await,
            Err(ChatError::Busy)
        ));
        assert!(matches!(
            manager.create_conversation().await,
            Err(ChatError::Busy)
        ));
    }

    #[tokio::test]
    async fn current_returns_none_for_unknown_selection() {
        let api = MockApi::new(empty_conversation_payload("c1"));
        let mut manager = ChatManager::new(api);
        manager.refresh().await;

        manager.select("missing");
        assert!(manager.current().is_none());
    }
}
