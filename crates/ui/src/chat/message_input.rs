use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    input::{Input, InputEvent, InputState},
    v_flex,
};
use parlor_client::{Field, MESSAGE_MAX_CHARS, MessageContent};

use crate::chat::events::SendRequested;

pub struct MessageInput {
    input_state: Entity<InputState>,
    enabled: bool,
    error_message: Option<SharedString>,
}

impl EventEmitter<SendRequested> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Type your message...")
                .clean_on_escape()
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, window, cx| match event {
                InputEvent::PressEnter { secondary: false } => this.handle_submit(window, cx),
                InputEvent::Change => {
                    if this.error_message.take().is_some() {
                        cx.notify();
                    }
                }
                _ => {}
            },
        )
        .detach();

        Self {
            input_state,
            enabled: false,
            error_message: None,
        }
    }

    /// Input is only usable while a room is selected.
    pub fn set_enabled(&mut self, enabled: bool, cx: &mut Context<Self>) {
        if self.enabled != enabled {
            self.enabled = enabled;
            cx.notify();
        }
    }

    pub fn set_error(&mut self, message: impl Into<SharedString>, cx: &mut Context<Self>) {
        self.error_message = Some(message.into());
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        self.error_message = None;
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.enabled {
            return;
        }

        let content = self.input_state.read(cx).value().to_string();
        if let Err(errors) = MessageContent::parse(&content) {
            if let Some(message) = errors.first(Field::Content) {
                self.set_error(message.to_string(), cx);
            }
            return;
        }

        cx.emit(SendRequested { content });
        self.clear(window, cx);
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let length = self.input_state.read(cx).value().chars().count();

        v_flex()
            .bg(theme.background)
            .gap_2()
            .p_3()
            .border_t_1()
            .border_color(theme.border)
            .child(
                div()
                    .w_full()
                    .px_3()
                    .py_2()
                    .rounded_lg()
                    .border_1()
                    .border_color(if self.error_message.is_some() {
                        theme.danger
                    } else {
                        theme.border
                    })
                    .child(
                        Input::new(&self.input_state)
                            .w_full()
                            .disabled(!self.enabled),
                    ),
            )
            .child(
                div()
                    .w_full()
                    .flex()
                    .items_center()
                    .justify_between()
                    .child(
                        div()
                            .text_xs()
                            .text_color(if length > MESSAGE_MAX_CHARS {
                                theme.danger
                            } else {
                                theme.muted_foreground
                            })
                            .child(match &self.error_message {
                                Some(error) => error.clone(),
                                None => format!("{length}/{MESSAGE_MAX_CHARS}").into(),
                            }),
                    )
                    .child(
                        Button::new("send")
                            .small()
                            .primary()
                            .icon(IconName::ArrowUp)
                            .child("Send")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.handle_submit(window, cx);
                            })),
                    ),
            )
    }
}
