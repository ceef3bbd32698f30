mod orchestrator;
mod state;

pub use orchestrator::{ChatCommand, ChatOrchestrator, CompletedRequest, PendingRequest, Ticket};
pub use state::{ChatState, Notice, NoticeLevel};
