use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    list::ListItem,
    v_flex,
};
use parlor_api::{Room, RoomId, UserId};
use parlor_client::{Field, RoomName};

use crate::chat::events::{CreateRoomRequested, DeleteRoomRequested, LogoutRequested, RoomSelected};

pub struct RoomSidebar {
    room_name_input: Entity<InputState>,
    rooms: Vec<Room>,
    selected_room: Option<RoomId>,
    user_id: Option<UserId>,
    loading: bool,
    name_error: Option<SharedString>,
}

impl EventEmitter<RoomSelected> for RoomSidebar {}
impl EventEmitter<CreateRoomRequested> for RoomSidebar {}
impl EventEmitter<DeleteRoomRequested> for RoomSidebar {}
impl EventEmitter<LogoutRequested> for RoomSidebar {}

impl RoomSidebar {
    pub fn new(user_id: Option<UserId>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let room_name_input =
            cx.new(|cx| InputState::new(window, cx).placeholder("New room name..."));

        cx.subscribe_in(
            &room_name_input,
            window,
            |this, _, event: &InputEvent, window, cx| match event {
                InputEvent::PressEnter { .. } => this.create_room(window, cx),
                InputEvent::Change => {
                    if this.name_error.take().is_some() {
                        cx.notify();
                    }
                }
                _ => {}
            },
        )
        .detach();

        Self {
            room_name_input,
            rooms: Vec::new(),
            selected_room: None,
            user_id,
            loading: false,
            name_error: None,
        }
    }

    pub fn set_rooms(
        &mut self,
        rooms: &[Room],
        selected_room: Option<RoomId>,
        loading: bool,
        cx: &mut Context<Self>,
    ) {
        self.rooms = rooms.to_vec();
        self.selected_room = selected_room;
        self.loading = loading;
        cx.notify();
    }

    fn select_room(&mut self, room_id: RoomId, cx: &mut Context<Self>) {
        if self.selected_room == Some(room_id) {
            return;
        }
        cx.emit(RoomSelected { room_id });
    }

    fn create_room(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let raw = self.room_name_input.read(cx).value().to_string();
        match RoomName::parse(&raw) {
            Ok(name) => {
                cx.emit(CreateRoomRequested {
                    name: name.into_inner(),
                });
                self.room_name_input.update(cx, |state, cx| {
                    state.set_value("", window, cx);
                });
                self.name_error = None;
            }
            Err(errors) => {
                self.name_error = errors.first(Field::RoomName).map(|m| m.to_string().into());
            }
        }
        cx.notify();
    }

    fn render_toolbar(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .w_full()
            .gap_1()
            .px_3()
            .pt(px(8.))
            .pb_2()
            .child(
                h_flex()
                    .w_full()
                    .min_w_0()
                    .gap_2()
                    .child(Input::new(&self.room_name_input).w_full().small())
                    .child(
                        Button::new("create-room")
                            .small()
                            .primary()
                            .icon(IconName::Plus)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.create_room(window, cx);
                            })),
                    ),
            )
            .when_some(self.name_error.clone(), |el, error| {
                el.child(div().text_xs().text_color(theme.danger).child(error))
            })
    }

    fn render_room_list(&mut self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        if self.rooms.is_empty() {
            let message = if self.loading {
                "Loading rooms..."
            } else {
                "No chat rooms yet"
            };
            return v_flex()
                .flex_1()
                .items_center()
                .justify_center()
                .px_4()
                .child(
                    Label::new(message)
                        .text_sm()
                        .text_color(theme.foreground.opacity(0.55)),
                )
                .into_any_element();
        }

        v_flex()
            .id("room-list")
            .flex_1()
            .min_h_0()
            .overflow_y_scroll()
            .px_2()
            .gap_1()
            .children(self.rooms.iter().enumerate().map(|(index, room)| {
                let room_id = room.id;
                let is_selected = self.selected_room == Some(room_id);

                ListItem::new(("room", index))
                    .w_full()
                    .px_3()
                    .py_2()
                    .rounded_md()
                    .selected(is_selected)
                    .on_click(cx.listener(move |this, _event: &ClickEvent, _window, cx| {
                        this.select_room(room_id, cx);
                    }))
                    .child(
                        h_flex()
                            .w_full()
                            .items_center()
                            .gap_2()
                            .child(
                                div()
                                    .flex_1()
                                    .min_w_0()
                                    .truncate()
                                    .child(Label::new(room.name.clone()).text_sm()),
                            )
                            .child(
                                Button::new(("delete-room", index))
                                    .ghost()
                                    .xsmall()
                                    .icon(IconName::Delete)
                                    .on_click(cx.listener(move |_, _, _, cx| {
                                        cx.stop_propagation();
                                        cx.emit(DeleteRoomRequested { room_id });
                                    })),
                            ),
                    )
            }))
            .into_any_element()
    }

    fn render_footer(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let user_label = match self.user_id {
            Some(user_id) => format!("User #{user_id}"),
            None => "Signed out".to_string(),
        };

        h_flex()
            .w_full()
            .min_w_0()
            .items_center()
            .justify_between()
            .px_3()
            .py_2()
            .border_t_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        Icon::new(IconName::CircleUser)
                            .size(px(18.))
                            .text_color(theme.foreground),
                    )
                    .child(
                        Label::new(user_label)
                            .text_xs()
                            .text_color(theme.muted_foreground),
                    ),
            )
            .child(
                Button::new("logout")
                    .ghost()
                    .small()
                    .child("Log out")
                    .on_click(cx.listener(|_, _, _, cx| {
                        cx.emit(LogoutRequested);
                    })),
            )
    }
}

impl Render for RoomSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let background = theme.background;

        v_flex()
            .size_full()
            .min_w_0()
            .bg(background)
            .child(self.render_toolbar(cx))
            .child(self.render_room_list(cx))
            .child(self.render_footer(cx))
    }
}
