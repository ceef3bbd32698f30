use parlor_api::{MessageId, RoomId};
use parlor_client::Notice;

/// Emitted when the user picks a room in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomSelected {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomRequested {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteRoomRequested {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequested {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteMessageRequested {
    pub message_id: MessageId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutRequested;

/// A toast the shell should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeRaised {
    pub notice: Notice,
}
