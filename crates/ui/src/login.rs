use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    input::{Input, InputEvent, InputState},
    v_flex,
};
use gpui_tokio_bridge::Tokio;
use parlor_client::{Credentials, Field, LoginInput, SessionManager, ValidationErrors};

/// Emitted once the session holder accepted a login.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub credentials: Arc<Credentials>,
}

pub struct LoginView {
    session: Arc<SessionManager>,
    username_input: Entity<InputState>,
    password_input: Entity<InputState>,
    field_errors: ValidationErrors,
    error_message: Option<SharedString>,
    submitting: bool,
    login_task: Option<Task<()>>,
}

impl EventEmitter<LoggedIn> for LoginView {}

impl LoginView {
    pub fn new(session: Arc<SessionManager>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let username_input = cx.new(|cx| InputState::new(window, cx).placeholder("Username"));
        let password_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Password")
                .masked(true)
        });

        for input in [&username_input, &password_input] {
            cx.subscribe_in(input, window, |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.submit(window, cx);
                }
            })
            .detach();
        }

        Self {
            session,
            username_input,
            password_input,
            field_errors: ValidationErrors::new(),
            error_message: None,
            submitting: false,
            login_task: None,
        }
    }

    fn submit(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        if self.submitting {
            return;
        }

        let username = self.username_input.read(cx).value().to_string();
        let password = self.password_input.read(cx).value().to_string();
        self.error_message = None;

        let input = match LoginInput::parse(&username, &password) {
            Ok(input) => input,
            Err(errors) => {
                self.field_errors = errors;
                cx.notify();
                return;
            }
        };
        self.field_errors = ValidationErrors::new();
        self.submitting = true;
        cx.notify();

        let session = self.session.clone();
        let login = Tokio::spawn(cx, async move { session.login_with(input).await });
        self.login_task = Some(cx.spawn(async move |this, cx| {
            let result = login.await;
            let _ = this.update(cx, |this, cx| {
                this.submitting = false;
                this.login_task = None;
                match result {
                    Ok(Ok(credentials)) => cx.emit(LoggedIn { credentials }),
                    Ok(Err(error)) => {
                        tracing::warn!("login failed: {error}");
                        this.error_message = Some(error.user_message().into());
                    }
                    Err(error) => {
                        tracing::error!("login task failed: {error}");
                        this.error_message = Some("Login failed".into());
                    }
                }
                cx.notify();
            });
        }));
    }

    fn render_field(
        &self,
        label: &'static str,
        field: Field,
        input: &Entity<InputState>,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .gap_1()
            .child(div().text_sm().text_color(theme.foreground).child(label))
            .child(Input::new(input).w_full())
            .when_some(self.field_errors.first(field), |el, message| {
                el.child(
                    div()
                        .text_xs()
                        .text_color(theme.danger)
                        .child(message.to_string()),
                )
            })
    }
}

impl Render for LoginView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("login-screen")
            .size_full()
            .items_center()
            .justify_center()
            .bg(theme.background)
            .child(
                v_flex()
                    .id("login-form")
                    .w(px(360.))
                    .gap_4()
                    .p_6()
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(theme.foreground)
                            .child("Sign in"),
                    )
                    .child(self.render_field("Username", Field::Username, &self.username_input, cx))
                    .child(self.render_field("Password", Field::Password, &self.password_input, cx))
                    .when_some(self.error_message.clone(), |el, error| {
                        el.child(div().text_sm().text_color(theme.danger).child(error))
                    })
                    .child(
                        Button::new("login-submit")
                            .primary()
                            .small()
                            .w_full()
                            .loading(self.submitting)
                            .child("Sign in")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.submit(window, cx);
                            })),
                    ),
            )
    }
}
