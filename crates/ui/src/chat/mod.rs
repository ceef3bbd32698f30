/// Event contracts between the chat screen's views.
pub mod events;
pub mod message_input;
pub mod message_list;
pub mod sidebar;
pub mod view;

pub use events::{
    CreateRoomRequested, DeleteMessageRequested, DeleteRoomRequested, LogoutRequested,
    NoticeRaised, RoomSelected, SendRequested,
};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use sidebar::RoomSidebar;
pub use view::ChatView;
