use std::fmt;
use std::sync::Arc;

use parlor_api::{
    ApiError, ApiResult, ChatBackend, Message, MessageId, NewMessage, NewRoom, Room, RoomId,
};

use super::state::{ChatState, Notice};
use crate::session::{Credentials, SessionManager};
use crate::validation::{MessageContent, RoomName, ValidationErrors};

/// A user intent against the chat screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    LoadRooms,
    LoadMessages,
    SelectRoom(RoomId),
    SendMessage(String),
    CreateRoom(String),
    DeleteRoom(RoomId),
    DeleteMessage(MessageId),
}

/// Sequence number of one issued load. Higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
enum RequestKind {
    LoadRooms { ticket: Ticket },
    LoadMessages { ticket: Ticket, room_id: RoomId },
    SendMessage { message: NewMessage },
    CreateRoom { name: RoomName },
    DeleteRoom { room_id: RoomId },
    DeleteMessage { message_id: MessageId },
}

impl RequestKind {
    fn label(&self) -> &'static str {
        match self {
            Self::LoadRooms { .. } => "load-rooms",
            Self::LoadMessages { .. } => "load-messages",
            Self::SendMessage { .. } => "send-message",
            Self::CreateRoom { .. } => "create-room",
            Self::DeleteRoom { .. } => "delete-room",
            Self::DeleteMessage { .. } => "delete-message",
        }
    }
}

/// A backend call that has been admitted but not yet run.
///
/// Owns the credentials it was issued under, so it can be moved onto another
/// task and executed there.
pub struct PendingRequest {
    kind: RequestKind,
    credentials: Arc<Credentials>,
    backend: Arc<dyn ChatBackend>,
}

impl PendingRequest {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn ticket(&self) -> Option<Ticket> {
        match self.kind {
            RequestKind::LoadRooms { ticket } | RequestKind::LoadMessages { ticket, .. } => {
                Some(ticket)
            }
            _ => None,
        }
    }

    pub async fn execute(self) -> CompletedRequest {
        let backend = self.backend.as_ref();
        let token = &self.credentials.token;
        tracing::debug!(request = self.kind.label(), "dispatching chat request");

        let outcome = match self.kind {
            RequestKind::LoadRooms { ticket } => Outcome::RoomsLoaded {
                ticket,
                result: backend.list_rooms(token).await,
            },
            RequestKind::LoadMessages { ticket, room_id } => Outcome::MessagesLoaded {
                ticket,
                room_id,
                result: backend.list_messages(token).await,
            },
            RequestKind::SendMessage { message } => Outcome::MessageSent {
                result: backend.send_message(token, message).await,
            },
            RequestKind::CreateRoom { name } => Outcome::RoomCreated {
                result: backend
                    .create_room(
                        token,
                        NewRoom {
                            name: name.into_inner(),
                        },
                    )
                    .await,
            },
            RequestKind::DeleteRoom { room_id } => Outcome::RoomDeleted {
                room_id,
                result: backend.delete_room(token, room_id).await,
            },
            RequestKind::DeleteMessage { message_id } => Outcome::MessageDeleted {
                message_id,
                result: backend.delete_message(token, message_id).await,
            },
        };

        CompletedRequest { outcome }
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("kind", &self.kind)
            .field("user_id", &self.credentials.user_id)
            .finish()
    }
}

/// Result of [`PendingRequest::execute`], waiting to be applied.
#[derive(Debug)]
pub struct CompletedRequest {
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    RoomsLoaded {
        ticket: Ticket,
        result: ApiResult<Vec<Room>>,
    },
    MessagesLoaded {
        ticket: Ticket,
        room_id: RoomId,
        result: ApiResult<Vec<Message>>,
    },
    MessageSent {
        result: ApiResult<Message>,
    },
    RoomCreated {
        result: ApiResult<Room>,
    },
    RoomDeleted {
        room_id: RoomId,
        result: ApiResult<()>,
    },
    MessageDeleted {
        message_id: MessageId,
        result: ApiResult<()>,
    },
}

/// Single owner of the chat screen state.
///
/// Every mutation goes through [`ChatOrchestrator::begin`] and
/// [`ChatOrchestrator::complete`]; network work happens in between, on
/// whatever task runs [`PendingRequest::execute`].
pub struct ChatOrchestrator {
    session: Arc<SessionManager>,
    state: ChatState,
    last_ticket: u64,
    rooms_ticket: Option<Ticket>,
    messages_ticket: Option<Ticket>,
}

impl ChatOrchestrator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            state: ChatState::default(),
            last_ticket: 0,
            rooms_ticket: None,
            messages_ticket: None,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.state.drain_notices()
    }

    /// Admits `command`: validates input, updates loading flags and returns the
    /// backend call to run, if any.
    pub fn begin(
        &mut self,
        command: ChatCommand,
    ) -> Result<Option<PendingRequest>, ValidationErrors> {
        let pending = match command {
            ChatCommand::LoadRooms => self.load_rooms(),
            ChatCommand::LoadMessages => self.load_messages(),
            ChatCommand::SelectRoom(room_id) => self.select_room(room_id),
            ChatCommand::SendMessage(content) => {
                let content = MessageContent::parse(&content)?;
                self.send_message(content)
            }
            ChatCommand::CreateRoom(name) => {
                let name = RoomName::parse(&name)?;
                self.request(RequestKind::CreateRoom { name })
            }
            ChatCommand::DeleteRoom(room_id) => self.request(RequestKind::DeleteRoom { room_id }),
            ChatCommand::DeleteMessage(message_id) => {
                self.request(RequestKind::DeleteMessage { message_id })
            }
        };
        Ok(pending)
    }

    /// Applies a finished request and returns the follow-up it implies.
    pub fn complete(&mut self, done: CompletedRequest) -> Option<PendingRequest> {
        match done.outcome {
            Outcome::RoomsLoaded { ticket, result } => {
                if self.rooms_ticket != Some(ticket) {
                    tracing::debug!(%ticket, "dropping stale room list");
                    return None;
                }
                self.state.rooms_loading = false;

                match result {
                    Ok(rooms) => self.apply_rooms(rooms),
                    Err(error) => {
                        self.fail("Failed to load chat rooms", &error);
                        None
                    }
                }
            }
            Outcome::MessagesLoaded {
                ticket,
                room_id,
                result,
            } => {
                if self.messages_ticket != Some(ticket) || self.state.selected != Some(room_id) {
                    tracing::debug!(%ticket, %room_id, "dropping stale message list");
                    return None;
                }
                self.state.messages_loading = false;

                match result {
                    Ok(messages) => {
                        self.state.messages = messages
                            .into_iter()
                            .filter(|message| message.room_id == room_id)
                            .collect();
                    }
                    Err(error) => self.fail("Failed to load messages", &error),
                }
                None
            }
            Outcome::MessageSent { result } => match result {
                Ok(message) => {
                    tracing::debug!(message_id = %message.id, "message sent");
                    self.load_messages()
                }
                Err(error) => {
                    self.fail("Failed to send message", &error);
                    None
                }
            },
            Outcome::RoomCreated { result } => match result {
                Ok(room) => {
                    let room_id = room.id;
                    tracing::info!(%room_id, "chat room created");
                    self.invalidate_room_loads();
                    self.state.rooms.push(room);
                    self.state.notify(Notice::success("Chat room created"));
                    self.select_room(room_id)
                }
                Err(error) => {
                    self.fail("Failed to create chat room", &error);
                    None
                }
            },
            Outcome::RoomDeleted { room_id, result } => match result {
                Ok(()) => {
                    tracing::info!(%room_id, "chat room deleted");
                    self.invalidate_room_loads();
                    self.state.rooms.retain(|room| room.id != room_id);
                    self.state.notify(Notice::success("Chat room deleted"));
                    if self.state.selected != Some(room_id) {
                        return None;
                    }

                    self.state.clear_selection();
                    self.messages_ticket = None;
                    let first = self.state.rooms.first().map(|room| room.id)?;
                    self.select_room(first)
                }
                Err(error) => {
                    self.fail("Failed to delete chat room", &error);
                    None
                }
            },
            Outcome::MessageDeleted { message_id, result } => {
                match result {
                    Ok(()) => self.state.messages.retain(|message| message.id != message_id),
                    Err(error) => self.fail("Failed to delete message", &error),
                }
                None
            }
        }
    }

    /// Runs `command` and every follow-up it triggers to completion.
    pub async fn dispatch(&mut self, command: ChatCommand) -> Result<(), ValidationErrors> {
        let mut next = self.begin(command)?;
        while let Some(pending) = next {
            let done = pending.execute().await;
            next = self.complete(done);
        }
        Ok(())
    }

    fn load_rooms(&mut self) -> Option<PendingRequest> {
        let credentials = self.credentials("load-rooms")?;
        let ticket = self.issue_ticket();
        self.rooms_ticket = Some(ticket);
        self.state.rooms_loading = true;
        Some(self.pending(RequestKind::LoadRooms { ticket }, credentials))
    }

    fn load_messages(&mut self) -> Option<PendingRequest> {
        let Some(room_id) = self.state.selected else {
            self.state.clear_selection();
            self.messages_ticket = None;
            return None;
        };

        let credentials = self.credentials("load-messages")?;
        let ticket = self.issue_ticket();
        self.messages_ticket = Some(ticket);
        self.state.messages_loading = true;
        Some(self.pending(RequestKind::LoadMessages { ticket, room_id }, credentials))
    }

    fn select_room(&mut self, room_id: RoomId) -> Option<PendingRequest> {
        if self.state.selected == Some(room_id) {
            return None;
        }
        if !self.state.has_room(room_id) {
            tracing::debug!(%room_id, "ignoring selection of unknown room");
            return None;
        }

        self.state.selected = Some(room_id);
        self.state.messages.clear();
        self.load_messages()
    }

    fn send_message(&mut self, content: MessageContent) -> Option<PendingRequest> {
        let Some(room_id) = self.state.selected else {
            tracing::warn!("no room selected, message not sent");
            return None;
        };
        let credentials = self.credentials("send-message")?;
        let message = NewMessage::to_room(content.into_inner(), credentials.user_id, room_id);
        Some(self.pending(RequestKind::SendMessage { message }, credentials))
    }

    fn apply_rooms(&mut self, rooms: Vec<Room>) -> Option<PendingRequest> {
        self.state.rooms = rooms;

        if let Some(selected) = self.state.selected
            && !self.state.has_room(selected)
        {
            tracing::debug!(room_id = %selected, "selected room no longer listed");
            self.state.clear_selection();
            self.messages_ticket = None;
        }

        if self.state.selected.is_some() {
            return None;
        }
        let first = self.state.rooms.first().map(|room| room.id)?;
        self.select_room(first)
    }

    /// Room lists requested before a local create or delete no longer
    /// reflect it and must not replace the current list.
    fn invalidate_room_loads(&mut self) {
        if let Some(ticket) = self.rooms_ticket.take() {
            tracing::debug!(%ticket, "room list superseded by local change");
        }
        self.state.rooms_loading = false;
    }

    fn request(&mut self, kind: RequestKind) -> Option<PendingRequest> {
        let credentials = self.credentials(kind.label())?;
        Some(self.pending(kind, credentials))
    }

    fn credentials(&self, request: &'static str) -> Option<Arc<Credentials>> {
        let credentials = self.session.current();
        if credentials.is_none() {
            tracing::warn!(request, "no active session, request skipped");
        }
        credentials
    }

    fn pending(&self, kind: RequestKind, credentials: Arc<Credentials>) -> PendingRequest {
        PendingRequest {
            kind,
            credentials,
            backend: self.session.backend().clone(),
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn fail(&mut self, title: &str, error: &ApiError) {
        tracing::warn!("{title}: {error}");
        self.state.notify(Notice::error(title, error.user_message()));
    }
}
