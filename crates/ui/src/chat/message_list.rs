use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use parlor_api::{Message, UserId};

use crate::chat::events::DeleteMessageRequested;

const BUBBLE_MAX_WIDTH: Pixels = px(540.);
const BUBBLE_PADDING_X: Pixels = px(14.);
const BUBBLE_PADDING_Y: Pixels = px(10.);

pub struct MessageList {
    messages: Vec<Message>,
    user_id: Option<UserId>,
    room_name: Option<SharedString>,
    loading: bool,
    scroll_handle: ScrollHandle,
}

impl EventEmitter<DeleteMessageRequested> for MessageList {}

impl MessageList {
    pub fn new(user_id: Option<UserId>, _cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            user_id,
            room_name: None,
            loading: false,
            scroll_handle: ScrollHandle::new(),
        }
    }

    pub fn set_messages(
        &mut self,
        room_name: Option<SharedString>,
        messages: &[Message],
        loading: bool,
        cx: &mut Context<Self>,
    ) {
        let room_changed = self.room_name != room_name;
        let grew = messages.len() > self.messages.len();

        self.room_name = room_name;
        self.messages = messages.to_vec();
        self.loading = loading;

        if room_changed || grew {
            self.scroll_handle.scroll_to_bottom();
        }
        cx.notify();
    }

    fn render_message_row(&self, message: &Message, index: usize, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let own = self.user_id.is_some_and(|user_id| message.is_from(user_id));
        let message_id = message.id;
        let sender = if own {
            "You".to_string()
        } else {
            format!("User #{}", message.sender_id)
        };

        v_flex()
            .id(("message", index))
            .w_full()
            .gap_1()
            .when(own, |column| column.items_end())
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        Label::new(sender)
                            .text_xs()
                            .text_color(theme.foreground.opacity(0.5)),
                    )
                    .child(
                        Label::new(message.timestamp.clone())
                            .text_xs()
                            .text_color(theme.muted_foreground),
                    )
                    .when(own, |header| {
                        header.child(
                            Button::new(("delete-message", index))
                                .ghost()
                                .xsmall()
                                .icon(IconName::Delete)
                                .on_click(cx.listener(move |_, _, _, cx| {
                                    cx.emit(DeleteMessageRequested { message_id });
                                })),
                        )
                    }),
            )
            .child(
                div()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .px(BUBBLE_PADDING_X)
                    .py(BUBBLE_PADDING_Y)
                    .rounded_lg()
                    .map(|bubble| {
                        if own {
                            bubble.bg(theme.accent).text_color(theme.accent_foreground)
                        } else {
                            bubble.bg(theme.muted).text_color(theme.foreground)
                        }
                    })
                    .child(Label::new(message.content.clone()).text_sm()),
            )
            .into_any_element()
    }

    fn render_placeholder(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let message = match (&self.room_name, self.loading) {
            (None, _) => "Select or create a chat room",
            (Some(_), true) => "Loading messages...",
            (Some(_), false) => "No messages yet",
        };

        v_flex()
            .flex_1()
            .items_center()
            .justify_center()
            .child(
                Label::new(message)
                    .text_sm()
                    .text_color(theme.foreground.opacity(0.55)),
            )
            .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        let header = h_flex()
            .w_full()
            .px_4()
            .py_2()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child(
                        self.room_name
                            .clone()
                            .unwrap_or_else(|| SharedString::from("No room selected")),
                    ),
            );

        let body = if self.messages.is_empty() {
            self.render_placeholder(cx)
        } else {
            v_flex()
                .id("message-list")
                .flex_1()
                .min_h_0()
                .overflow_y_scroll()
                .track_scroll(&self.scroll_handle)
                .gap_3()
                .px_4()
                .py_3()
                .children(
                    self.messages
                        .iter()
                        .enumerate()
                        .map(|(index, message)| self.render_message_row(message, index, cx)),
                )
                .into_any_element()
        };

        v_flex()
            .size_full()
            .min_h_0()
            .bg(theme.background)
            .child(header)
            .child(body)
    }
}
