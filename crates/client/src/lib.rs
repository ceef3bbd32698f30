mod chat;
mod session;
mod settings;
mod store;
#[cfg(test)]
mod testing;
mod validation;

pub use chat::{
    ChatCommand, ChatOrchestrator, ChatState, CompletedRequest, Notice, NoticeLevel,
    PendingRequest, Ticket,
};
pub use session::{Credentials, LoginError, SessionManager};
pub use settings::{ClientSettings, ENV_PREFIX, SETTINGS_FILE_NAME, SettingsError};
pub use store::{FileSessionStore, MemorySessionStore, SESSION_FILE_NAME, SessionStore, SessionStoreError};
pub use validation::{
    Field, LoginInput, MESSAGE_MAX_CHARS, MessageContent, PASSWORD_MAX_CHARS,
    ROOM_NAME_MAX_CHARS, RoomName, USERNAME_MAX_CHARS, ValidationErrors,
};
