use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Assistant",
        }
    }
}

/// A single utterance in a conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    /// ISO-8601 creation time
    pub timestamp: String,
    pub sender: Sender,
}

impl Message {
    /// Build a user message locally, ahead of server confirmation.
    ///
    /// Local ids live in their own `local-` namespace so they can never
    /// collide with server-assigned message ids.
    pub fn local_user(content: String) -> Self {
        Self {
            id: format!("local-{}", Utc::now().timestamp_millis()),
            content,
            timestamp: Utc::now().to_rfc3339(),
            sender: Sender::User,
        }
    }

    /// Build an assistant message from a reply body.
    pub fn from_reply(content: String) -> Self {
        Self {
            id: format!("local-{}", Utc::now().timestamp_millis() + 1),
            content,
            timestamp: Utc::now().to_rfc3339(),
            sender: Sender::Assistant,
        }
    }

    /// Map a server message record. `from == "user"` maps to the user
    /// sender; anything else is treated as the assistant.
    pub fn from_record(record: MessageRecord) -> Self {
        Self {
            id: record
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            content: record.text,
            timestamp: record
                .timestamp
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            sender: if record.from == "user" {
                Sender::User
            } else {
                Sender::Assistant
            },
        }
    }
}

/// A conversation as the client sees it: server-assigned id, ordered
/// messages, and an open-ended triage record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Server-provided title; empty when the server omits it
    pub title: String,
    pub messages: Vec<Message>,
    /// Arbitrary assessment fields; empty means triage is incomplete
    pub triage: Map<String, Value>,
}

impl Conversation {
    /// Map a server record into the client shape. Missing optional fields
    /// get documented defaults; this never fails.
    pub fn from_record(record: ConversationRecord) -> Self {
        let messages = record.chat.into_iter().map(Message::from_record).collect();
        Self {
            id: record.id,
            title: record.title.unwrap_or_default(),
            messages,
            triage: record.triage,
        }
    }

    /// Title shown in the sidebar: the explicit title, else the leading 30
    /// characters of the first message, else a label from the id prefix.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        if let Some(first) = self.messages.first() {
            let head: String = first.content.chars().take(30).collect();
            if first.content.chars().count() > 30 {
                return format!("{}...", head);
            }
            return head;
        }
        let prefix: String = self.id.chars().take(8).collect();
        format!("Conversation {}", prefix)
    }

    /// A triage record with no fields counts as incomplete.
    pub fn is_triage_complete(&self) -> bool {
        !self.triage.is_empty()
    }

    /// True when the triage marked this conversation as an emergency.
    pub fn is_emergency(&self) -> bool {
        matches!(self.triage.get("emergency"), Some(Value::Bool(true)))
    }
}

/// Conversation as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub chat: Vec<MessageRecord>,
    #[serde(default)]
    pub triage: Map<String, Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Message as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub from: String,
}

/// Body of the send-message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub message: String,
    pub timestamp: String,
}

/// Response to a create-conversation request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChatResponse {
    pub id: String,
}

/// Response to a send-message request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Unwrap a list payload and map it into conversations.
///
/// The server answers either `{ "data": [...] }` or a bare array; a present
/// but null `data` field falls through to the whole payload. A payload that
/// is not a sequence yields `Ok(None)` so the caller can degrade to an empty
/// list after logging; a sequence that cannot be decoded is an error.
pub fn conversations_from_payload(
    payload: Value,
) -> Result<Option<Vec<Conversation>>, serde_json::Error> {
    let data = match payload.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => payload,
    };

    if !data.is_array() {
        return Ok(None);
    }

    let records: Vec<ConversationRecord> = serde_json::from_value(data)?;
    Ok(Some(records.into_iter().map(Conversation::from_record).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conversation_with_messages(id: &str, contents: &[&str]) -> Conversation {
        Conversation {
            id: id.to_string(),
            title: String::new(),
            messages: contents
                .iter()
                .map(|c| Message::local_user(c.to_string()))
                .collect(),
            triage: Map::new(),
        }
    }

    #[test]
    fn explicit_title_wins() {
        let mut conv = conversation_with_messages("abc", &["hello"]);
        conv.title = "Back pain".to_string();
        assert_eq!(conv.display_title(), "Back pain");
    }

    #[test]
    fn title_falls_back_to_first_message_head() {
        let conv = conversation_with_messages("abc", &["short message"]);
        assert_eq!(conv.display_title(), "short message");

        let long = "a".repeat(45);
        let conv = conversation_with_messages("abc", &[long.as_str()]);
        assert_eq!(conv.display_title(), format!("{}...", "a".repeat(30)));
    }

    #[test]
    fn title_falls_back_to_id_prefix() {
        let conv = conversation_with_messages("0123456789abcdef", &[]);
        assert_eq!(conv.display_title(), "Conversation 01234567");
    }

    #[test]
    fn sender_mapping_defaults_to_assistant() {
        let user = Message::from_record(MessageRecord {
            id: None,
            text: "hi".to_string(),
            timestamp: None,
            from: "user".to_string(),
        });
        assert_eq!(user.sender, Sender::User);

        let bot = Message::from_record(MessageRecord {
            id: None,
            text: "hi".to_string(),
            timestamp: None,
            from: "bot".to_string(),
        });
        assert_eq!(bot.sender, Sender::Assistant);
    }

    #[test]
    fn missing_optionals_get_defaults() {
        let record: ConversationRecord =
            serde_json::from_value(json!({ "_id": "c1", "chat": [{ "text": "oi", "from": "user" }] }))
                .unwrap();
        let conv = Conversation::from_record(record);
        assert_eq!(conv.id, "c1");
        assert_eq!(conv.title, "");
        assert!(conv.triage.is_empty());
        assert_eq!(conv.messages.len(), 1);
        assert!(!conv.messages[0].id.is_empty());
        assert!(!conv.messages[0].timestamp.is_empty());
    }

    #[test]
    fn payload_unwraps_data_or_bare_array() {
        let wrapped = json!({ "data": [{ "_id": "c1", "chat": [] }] });
        let convs = conversations_from_payload(wrapped).unwrap().unwrap();
        assert_eq!(convs[0].id, "c1");

        let bare = json!([{ "_id": "c2", "chat": [] }]);
        let convs = conversations_from_payload(bare).unwrap().unwrap();
        assert_eq!(convs[0].id, "c2");
    }

    #[test]
    fn null_data_falls_through_to_payload() {
        let payload = json!({ "data": null });
        assert!(conversations_from_payload(payload).unwrap().is_none());
    }

    #[test]
    fn non_sequence_payload_yields_none() {
        let payload = json!({ "data": { "unexpected": true } });
        assert!(conversations_from_payload(payload).unwrap().is_none());
        assert!(conversations_from_payload(json!("nope")).unwrap().is_none());
    }

    #[test]
    fn triage_helpers() {
        let mut conv = conversation_with_messages("c1", &[]);
        assert!(!conv.is_triage_complete());
        assert!(!conv.is_emergency());

        conv.triage
            .insert("complaint".to_string(), json!("chest pain"));
        assert!(conv.is_triage_complete());
        assert!(!conv.is_emergency());

        conv.triage.insert("emergency".to_string(), json!(true));
        assert!(conv.is_emergency());
    }

    #[test]
    fn local_ids_are_namespaced() {
        let msg = Message::local_user("hello".to_string());
        assert!(msg.id.starts_with("local-"));
        assert_eq!(msg.sender, Sender::User);
    }
}
