use std::collections::VecDeque;

use parlor_api::{Message, Room, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Success,
}

/// A non-blocking, user-visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Everything the chat screen renders.
///
/// `messages` only ever holds messages of `selected`; it is empty when no room
/// is selected.
#[derive(Debug, Default)]
pub struct ChatState {
    pub(crate) rooms: Vec<Room>,
    pub(crate) selected: Option<RoomId>,
    pub(crate) messages: Vec<Message>,
    pub(crate) rooms_loading: bool,
    pub(crate) messages_loading: bool,
    pub(crate) notices: VecDeque<Notice>,
}

impl ChatState {
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn selected_room_id(&self) -> Option<RoomId> {
        self.selected
    }

    pub fn selected_room(&self) -> Option<&Room> {
        let selected = self.selected?;
        self.rooms.iter().find(|room| room.id == selected)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading_rooms(&self) -> bool {
        self.rooms_loading
    }

    pub fn is_loading_messages(&self) -> bool {
        self.messages_loading
    }

    pub fn has_room(&self, room_id: RoomId) -> bool {
        self.rooms.iter().any(|room| room.id == room_id)
    }

    /// Takes queued notices in the order they were raised.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.messages.clear();
        self.messages_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_drain_in_order() {
        let mut state = ChatState::default();
        state.notify(Notice::success("Chat room created"));
        state.notify(Notice::error("Failed to send message", "boom"));

        let drained = state.drain_notices();
        assert_eq!(drained.len(), 2);
        assert!(!drained[0].is_error());
        assert_eq!(drained[1].description.as_deref(), Some("boom"));
        assert!(state.drain_notices().is_empty());
    }

    #[test]
    fn selected_room_resolves_against_room_list() {
        let mut state = ChatState::default();
        state.rooms = vec![Room::new(RoomId::new(1), "general")];
        assert!(state.selected_room().is_none());

        state.selected = Some(RoomId::new(1));
        assert_eq!(state.selected_room().map(|room| room.name.as_str()), Some("general"));

        state.selected = Some(RoomId::new(2));
        assert!(state.selected_room().is_none());
    }
}
