use std::sync::Arc;

use gpui::*;
use gpui_component::{ActiveTheme, h_flex, v_flex};
use gpui_tokio_bridge::Tokio;
use parlor_client::{
    ChatCommand, ChatOrchestrator, CompletedRequest, Field, Notice, PendingRequest, SessionManager,
};

use crate::chat::events::{
    CreateRoomRequested, DeleteMessageRequested, DeleteRoomRequested, LogoutRequested,
    NoticeRaised, RoomSelected, SendRequested,
};
use crate::chat::message_input::MessageInput;
use crate::chat::message_list::MessageList;
use crate::chat::sidebar::RoomSidebar;

pub const SIDEBAR_WIDTH: f32 = 260.0;

/// Chat screen: owns the orchestrator and runs its requests on the tokio
/// runtime, applying results back on the UI thread.
pub struct ChatView {
    orchestrator: ChatOrchestrator,
    sidebar: Entity<RoomSidebar>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
}

impl EventEmitter<NoticeRaised> for ChatView {}
impl EventEmitter<LogoutRequested> for ChatView {}

impl ChatView {
    pub fn new(session: Arc<SessionManager>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let user_id = session.user_id();
        let sidebar = cx.new(|cx| RoomSidebar::new(user_id, window, cx));
        let message_list = cx.new(|cx| MessageList::new(user_id, cx));
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.subscribe(&sidebar, |this, _, event: &RoomSelected, cx| {
            this.run(ChatCommand::SelectRoom(event.room_id), cx);
        })
        .detach();
        cx.subscribe(&sidebar, |this, _, event: &CreateRoomRequested, cx| {
            this.run(ChatCommand::CreateRoom(event.name.clone()), cx);
        })
        .detach();
        cx.subscribe(&sidebar, |this, _, event: &DeleteRoomRequested, cx| {
            this.run(ChatCommand::DeleteRoom(event.room_id), cx);
        })
        .detach();
        cx.subscribe(&sidebar, |_, _, _event: &LogoutRequested, cx| {
            cx.emit(LogoutRequested);
        })
        .detach();
        cx.subscribe(&message_list, |this, _, event: &DeleteMessageRequested, cx| {
            this.run(ChatCommand::DeleteMessage(event.message_id), cx);
        })
        .detach();
        cx.subscribe(&message_input, |this, _, event: &SendRequested, cx| {
            this.run(ChatCommand::SendMessage(event.content.clone()), cx);
        })
        .detach();

        let mut view = Self {
            orchestrator: ChatOrchestrator::new(session),
            sidebar,
            message_list,
            message_input,
        };
        view.run(ChatCommand::LoadRooms, cx);
        view
    }

    pub fn reload(&mut self, cx: &mut Context<Self>) {
        self.run(ChatCommand::LoadRooms, cx);
        self.run(ChatCommand::LoadMessages, cx);
    }

    fn run(&mut self, command: ChatCommand, cx: &mut Context<Self>) {
        match self.orchestrator.begin(command) {
            Ok(Some(pending)) => self.spawn_request(pending, cx),
            Ok(None) => {}
            Err(errors) => {
                tracing::debug!("rejected chat input: {errors}");
                if let Some(message) = errors.first(Field::Content) {
                    let message = message.to_string();
                    self.message_input
                        .update(cx, |input, cx| input.set_error(message, cx));
                }
                if let Some(message) = errors.first(Field::RoomName) {
                    cx.emit(NoticeRaised {
                        notice: Notice::error("Failed to create chat room", message),
                    });
                }
            }
        }
        self.sync_children(cx);
    }

    fn spawn_request(&mut self, pending: PendingRequest, cx: &mut Context<Self>) {
        let label = pending.label();
        let request = Tokio::spawn(cx, pending.execute());

        cx.spawn(async move |this, cx| {
            let done = match request.await {
                Ok(done) => done,
                Err(error) => {
                    tracing::error!(request = label, "chat request task failed: {error}");
                    return;
                }
            };

            let _ = this.update(cx, |this, cx| {
                this.apply(done, cx);
            });
        })
        .detach();
    }

    fn apply(&mut self, done: CompletedRequest, cx: &mut Context<Self>) {
        if let Some(follow_up) = self.orchestrator.complete(done) {
            self.spawn_request(follow_up, cx);
        }
        self.sync_children(cx);
    }

    /// Pushes orchestrator state into the child views and forwards notices.
    fn sync_children(&mut self, cx: &mut Context<Self>) {
        for notice in self.orchestrator.drain_notices() {
            cx.emit(NoticeRaised { notice });
        }

        let state = self.orchestrator.state();
        let room_name = state
            .selected_room()
            .map(|room| SharedString::from(room.name.clone()));
        let has_selection = state.selected_room_id().is_some();

        self.sidebar.update(cx, |sidebar, cx| {
            sidebar.set_rooms(
                state.rooms(),
                state.selected_room_id(),
                state.is_loading_rooms(),
                cx,
            );
        });
        self.message_list.update(cx, |list, cx| {
            list.set_messages(
                room_name,
                state.messages(),
                state.is_loading_messages(),
                cx,
            );
        });
        self.message_input
            .update(cx, |input, cx| input.set_enabled(has_selection, cx));
        cx.notify();
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("chat-view")
            .size_full()
            .min_h_0()
            .bg(theme.background)
            .child(
                div()
                    .id("sidebar-container")
                    .h_full()
                    .w(px(SIDEBAR_WIDTH))
                    .flex_shrink_0()
                    .overflow_hidden()
                    .border_r_1()
                    .border_color(theme.border)
                    .child(self.sidebar.clone()),
            )
            .child(
                v_flex()
                    .id("main-content")
                    .flex_1()
                    .h_full()
                    .min_w_0()
                    .min_h_0()
                    .overflow_hidden()
                    .child(div().flex_1().min_h_0().child(self.message_list.clone()))
                    .child(self.message_input.clone()),
            )
    }
}
