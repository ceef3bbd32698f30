//! In-memory backend shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use parlor_api::{
    ApiError, ApiResult, AuthToken, BoxFuture, ChatBackend, LoginRequest, LoginResponse, Message,
    MessageId, NewMessage, NewRoom, Room, RoomId, UserId,
};

#[derive(Default)]
struct FakeState {
    rooms: Vec<Room>,
    messages: Vec<Message>,
    next_id: i64,
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
}

pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub const TOKEN: &'static str = "fake-token";
    pub const USER_ID: UserId = UserId::new(7);

    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_rooms(self, rooms: &[(i64, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.rooms = rooms
                .iter()
                .map(|(id, name)| Room::new(RoomId::new(*id), *name))
                .collect();
        }
        self
    }

    /// Seeds messages as `(id, room, sender, content)`, in server order.
    pub fn with_messages(self, messages: &[(i64, i64, i64, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.messages = messages
                .iter()
                .map(|(id, room, sender, content)| Message {
                    id: MessageId::new(*id),
                    content: content.to_string(),
                    timestamp: format!("2025-03-01T10:{:02}:00Z", id % 60),
                    sender_id: UserId::new(*sender),
                    room_id: RoomId::new(*room),
                    recipient_ids: Vec::new(),
                })
                .collect();
        }
        self
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    pub fn calls(&self, operation: &'static str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn room_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .rooms
            .iter()
            .map(|room| room.name.clone())
            .collect()
    }

    pub fn sent_messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    fn call<T>(
        &self,
        operation: &'static str,
        token: Option<&AuthToken>,
        handler: impl FnOnce(&mut FakeState) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;

        if state.failing.contains(operation) {
            return Err(ApiError::Status {
                stage: operation,
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        if let Some(token) = token
            && token.as_str() != Self::TOKEN
        {
            return Err(ApiError::Status {
                stage: operation,
                status: 401,
                message: "Invalid token.".to_string(),
            });
        }

        handler(&mut state)
    }
}

fn not_found(stage: &'static str) -> ApiError {
    ApiError::Status {
        stage,
        status: 404,
        message: "Not found.".to_string(),
    }
}

impl ChatBackend for FakeBackend {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>> {
        let result = self.call("login", None, |_| {
            if request.password == "secret" {
                Ok(LoginResponse {
                    token: AuthToken::new(Self::TOKEN),
                    user_id: Self::USER_ID,
                })
            } else {
                Err(ApiError::Status {
                    stage: "login",
                    status: 400,
                    message: "Unable to log in with provided credentials.".to_string(),
                })
            }
        });
        Box::pin(async move { result })
    }

    fn logout<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<()>> {
        let result = self.call("logout", Some(token), |_| Ok(()));
        Box::pin(async move { result })
    }

    fn list_rooms<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<Vec<Room>>> {
        let result = self.call("list-rooms", Some(token), |state| Ok(state.rooms.clone()));
        Box::pin(async move { result })
    }

    fn get_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<Room>> {
        let result = self.call("get-room", Some(token), |state| {
            state
                .rooms
                .iter()
                .find(|room| room.id == room_id)
                .cloned()
                .ok_or_else(|| not_found("get-room"))
        });
        Box::pin(async move { result })
    }

    fn create_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room: NewRoom,
    ) -> BoxFuture<'a, ApiResult<Room>> {
        let result = self.call("create-room", Some(token), |state| {
            state.next_id += 1;
            let created = Room::new(RoomId::new(state.next_id), room.name);
            state.rooms.push(created.clone());
            Ok(created)
        });
        Box::pin(async move { result })
    }

    fn delete_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<()>> {
        let result = self.call("delete-room", Some(token), |state| {
            let before = state.rooms.len();
            state.rooms.retain(|room| room.id != room_id);
            if state.rooms.len() == before {
                return Err(not_found("delete-room"));
            }
            state.messages.retain(|message| message.room_id != room_id);
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn list_messages<'a>(
        &'a self,
        token: &'a AuthToken,
    ) -> BoxFuture<'a, ApiResult<Vec<Message>>> {
        let result = self.call("list-messages", Some(token), |state| {
            Ok(state.messages.clone())
        });
        Box::pin(async move { result })
    }

    fn send_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message: NewMessage,
    ) -> BoxFuture<'a, ApiResult<Message>> {
        let result = self.call("send-message", Some(token), |state| {
            state.next_id += 1;
            let created = Message {
                id: MessageId::new(state.next_id),
                content: message.content,
                timestamp: "2025-03-01T12:00:00Z".to_string(),
                sender_id: message.sender_id,
                room_id: message.room_id,
                recipient_ids: message.recipient_ids,
            };
            state.messages.push(created.clone());
            Ok(created)
        });
        Box::pin(async move { result })
    }

    fn delete_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message_id: MessageId,
    ) -> BoxFuture<'a, ApiResult<()>> {
        let result = self.call("delete-message", Some(token), |state| {
            let before = state.messages.len();
            state.messages.retain(|message| message.id != message_id);
            if state.messages.len() == before {
                Err(not_found("delete-message"))
            } else {
                Ok(())
            }
        });
        Box::pin(async move { result })
    }
}
