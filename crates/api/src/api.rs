use futures::future::BoxFuture;

use crate::error::ApiResult;
use crate::http::{HttpClient, HttpConfig, Operation};
use crate::types::{
    AuthToken, LoginRequest, LoginResponse, Message, MessageId, NewMessage, NewRoom, Room, RoomId,
};

const LOGIN: Operation = Operation::new("login", "Login failed");
const LOGOUT: Operation = Operation::new("logout", "Logout failed");
const LIST_ROOMS: Operation = Operation::new("list-rooms", "Failed to fetch chat rooms");
const GET_ROOM: Operation = Operation::new("get-room", "Failed to fetch chat room detail");
const CREATE_ROOM: Operation = Operation::new("create-room", "Failed to create chat room");
const DELETE_ROOM: Operation = Operation::new("delete-room", "Failed to delete chat room");
const LIST_MESSAGES: Operation = Operation::new("list-messages", "Failed to fetch messages");
const SEND_MESSAGE: Operation = Operation::new("send-message", "Failed to send message");
const DELETE_MESSAGE: Operation = Operation::new("delete-message", "Failed to delete message");

/// Backend operations consumed by the session holder and the chat orchestrator.
///
/// Implemented over HTTP by [`RestBackend`]; tests substitute in-memory fakes.
pub trait ChatBackend: Send + Sync {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>>;
    fn logout<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<()>>;

    fn list_rooms<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<Vec<Room>>>;
    fn get_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<Room>>;
    fn create_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room: NewRoom,
    ) -> BoxFuture<'a, ApiResult<Room>>;
    fn delete_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<()>>;

    /// Returns every message visible to the token, across all rooms.
    fn list_messages<'a>(&'a self, token: &'a AuthToken)
    -> BoxFuture<'a, ApiResult<Vec<Message>>>;
    fn send_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message: NewMessage,
    ) -> BoxFuture<'a, ApiResult<Message>>;
    fn delete_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message_id: MessageId,
    ) -> BoxFuture<'a, ApiResult<()>>;
}

/// `/login/` and `/logout/`.
pub struct SessionsApi<'a> {
    http: &'a HttpClient,
}

impl SessionsApi<'_> {
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.http.post_json(LOGIN, "/login/", None, request).await
    }

    pub async fn logout(&self, token: &AuthToken) -> ApiResult<()> {
        self.http.post_empty(LOGOUT, "/logout/", token).await
    }
}

/// `/chat_rooms` resource.
pub struct RoomsApi<'a> {
    http: &'a HttpClient,
}

impl RoomsApi<'_> {
    pub async fn list(&self, token: &AuthToken) -> ApiResult<Vec<Room>> {
        self.http.get_json(LIST_ROOMS, "/chat_rooms", token).await
    }

    pub async fn get(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<Room> {
        let path = format!("/chat_rooms/{room_id}");
        self.http.get_json(GET_ROOM, &path, token).await
    }

    pub async fn create(&self, token: &AuthToken, room: &NewRoom) -> ApiResult<Room> {
        self.http
            .post_json(CREATE_ROOM, "/chat_rooms/", Some(token), room)
            .await
    }

    pub async fn delete(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        let path = format!("/chat_rooms/{room_id}/");
        self.http.delete(DELETE_ROOM, &path, token).await
    }
}

/// `/messages` resource.
pub struct MessagesApi<'a> {
    http: &'a HttpClient,
}

impl MessagesApi<'_> {
    pub async fn list(&self, token: &AuthToken) -> ApiResult<Vec<Message>> {
        self.http.get_json(LIST_MESSAGES, "/messages", token).await
    }

    pub async fn send(&self, token: &AuthToken, message: &NewMessage) -> ApiResult<Message> {
        self.http
            .post_json(SEND_MESSAGE, "/messages/", Some(token), message)
            .await
    }

    pub async fn delete(&self, token: &AuthToken, message_id: MessageId) -> ApiResult<()> {
        let path = format!("/messages/{message_id}/");
        self.http.delete(DELETE_MESSAGE, &path, token).await
    }
}

/// [`ChatBackend`] over the REST API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http: HttpClient,
}

impl RestBackend {
    pub fn new(config: HttpConfig) -> ApiResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_client(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn sessions(&self) -> SessionsApi<'_> {
        SessionsApi { http: &self.http }
    }

    pub fn rooms(&self) -> RoomsApi<'_> {
        RoomsApi { http: &self.http }
    }

    pub fn messages(&self) -> MessagesApi<'_> {
        MessagesApi { http: &self.http }
    }
}

impl ChatBackend for RestBackend {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, ApiResult<LoginResponse>> {
        Box::pin(async move { self.sessions().login(&request).await })
    }

    fn logout<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move { self.sessions().logout(token).await })
    }

    fn list_rooms<'a>(&'a self, token: &'a AuthToken) -> BoxFuture<'a, ApiResult<Vec<Room>>> {
        Box::pin(async move { self.rooms().list(token).await })
    }

    fn get_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<Room>> {
        Box::pin(async move { self.rooms().get(token, room_id).await })
    }

    fn create_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room: NewRoom,
    ) -> BoxFuture<'a, ApiResult<Room>> {
        Box::pin(async move { self.rooms().create(token, &room).await })
    }

    fn delete_room<'a>(
        &'a self,
        token: &'a AuthToken,
        room_id: RoomId,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move { self.rooms().delete(token, room_id).await })
    }

    fn list_messages<'a>(
        &'a self,
        token: &'a AuthToken,
    ) -> BoxFuture<'a, ApiResult<Vec<Message>>> {
        Box::pin(async move { self.messages().list(token).await })
    }

    fn send_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message: NewMessage,
    ) -> BoxFuture<'a, ApiResult<Message>> {
        Box::pin(async move { self.messages().send(token, &message).await })
    }

    fn delete_message<'a>(
        &'a self,
        token: &'a AuthToken,
        message_id: MessageId,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move { self.messages().delete(token, message_id).await })
    }
}
