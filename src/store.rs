//! In-memory state for the conversation list.

use crate::types::{Conversation, Message};

/// Holds the conversation list, the selected conversation id, and the
/// single-slot in-flight token that serializes create/send operations.
///
/// The store is a plain state holder: selection does not validate that the
/// id exists, and mutations on an unknown id are no-ops.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    selected: Option<String>,
    busy: bool,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a conversation. Selecting an id that is not in the store is
    /// allowed; `current()` simply returns `None` until a refetch brings
    /// the conversation in.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Atomically replace the whole list with the server's canonical
    /// version. Used after every successful list/create/send cycle.
    pub fn replace_all(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Append a message to the conversation matching `id`; no-op when no
    /// conversation matches.
    pub fn append_message(&mut self, id: &str, message: Message) {
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == id) {
            conv.messages.push(message);
        }
    }

    /// Drop the most recently appended message from the conversation
    /// matching `id`. Used to roll back a failed optimistic send; no-op
    /// when no conversation matches or it has no messages.
    pub fn remove_last_message(&mut self, id: &str) {
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == id) {
            conv.messages.pop();
        }
    }

    /// The conversation matching the selected id, if any.
    pub fn current(&self) -> Option<&Conversation> {
        let selected = self.selected.as_deref()?;
        self.conversations.iter().find(|c| c.id == selected)
    }

    /// Claim the in-flight slot. Returns false when an operation is
    /// already outstanding, in which case the caller must not proceed.
    pub fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Release the in-flight slot. Called on both success and failure.
    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
