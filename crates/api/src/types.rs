use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned chat room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl RoomId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl MessageId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque bearer token issued by `/login/`.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    /// ISO-8601 timestamp exactly as the server sent it.
    pub timestamp: String,
    #[serde(rename = "sender")]
    pub sender_id: UserId,
    #[serde(rename = "chat_room")]
    pub room_id: RoomId,
    /// Vestigial on the backend; always sent empty.
    #[serde(rename = "receiver", default)]
    pub recipient_ids: Vec<UserId>,
}

impl Message {
    pub fn is_from(&self, user_id: UserId) -> bool {
        self.sender_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRoom {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub content: String,
    #[serde(rename = "sender")]
    pub sender_id: UserId,
    #[serde(rename = "chat_room")]
    pub room_id: RoomId,
    #[serde(rename = "receiver")]
    pub recipient_ids: Vec<UserId>,
}

impl NewMessage {
    /// Builds a send payload addressed to the whole room.
    pub fn to_room(content: impl Into<String>, sender_id: UserId, room_id: RoomId) -> Self {
        Self {
            content: content.into(),
            sender_id,
            room_id,
            recipient_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_backend_field_names() {
        let payload = r#"{
            "id": 7,
            "content": "hello",
            "timestamp": "2025-03-01T10:00:00Z",
            "sender": 3,
            "chat_room": 12,
            "receiver": []
        }"#;

        let message: Message = serde_json::from_str(payload).unwrap();
        assert_eq!(message.id, MessageId::new(7));
        assert_eq!(message.sender_id, UserId::new(3));
        assert_eq!(message.room_id, RoomId::new(12));
        assert!(message.recipient_ids.is_empty());
        assert!(message.is_from(UserId::new(3)));
    }

    #[test]
    fn missing_receiver_defaults_to_empty() {
        let payload = r#"{"id":1,"content":"x","timestamp":"t","sender":1,"chat_room":2}"#;
        let message: Message = serde_json::from_str(payload).unwrap();
        assert!(message.recipient_ids.is_empty());
    }

    #[test]
    fn send_payload_always_carries_empty_receiver() {
        let body = NewMessage::to_room("hi", UserId::new(4), RoomId::new(9));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "hi",
                "sender": 4,
                "chat_room": 9,
                "receiver": [],
            })
        );
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "AuthToken(<redacted>)");
        assert_eq!(token.header_value(), "Token super-secret");
    }
}
