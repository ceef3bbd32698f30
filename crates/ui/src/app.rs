use std::sync::Arc;

use gpui::*;
use gpui_component::notification::{Notification, NotificationList};
use gpui_component::{ActiveTheme, v_flex};
use gpui_tokio_bridge::Tokio;
use parlor_client::{Notice, NoticeLevel, SessionManager};

use crate::chat::{ChatView, LogoutRequested, NoticeRaised};
use crate::login::{LoggedIn, LoginView};

gpui::actions!(shell, [Refresh, Quit]);

enum Screen {
    Login(Entity<LoginView>),
    Chat(Entity<ChatView>),
}

/// Root view: shows the login form or the chat screen depending on whether a
/// session is active.
pub struct ParlorShell {
    session: Arc<SessionManager>,
    notification_list: Entity<NotificationList>,
    screen: Screen,
    _subscriptions: Vec<Subscription>,
}

impl ParlorShell {
    pub fn new(
        session: Arc<SessionManager>,
        notification_list: Entity<NotificationList>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let (screen, subscriptions) = if session.is_authenticated() {
            Self::chat_screen(session.clone(), window, cx)
        } else {
            Self::login_screen(session.clone(), window, cx)
        };

        Self {
            session,
            notification_list,
            screen,
            _subscriptions: subscriptions,
        }
    }

    fn login_screen(
        session: Arc<SessionManager>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> (Screen, Vec<Subscription>) {
        let login = cx.new(|cx| LoginView::new(session, window, cx));
        let subscription =
            cx.subscribe_in(&login, window, |this, _, event: &LoggedIn, window, cx| {
                tracing::info!(user_id = %event.credentials.user_id, "opening chat screen");
                let chat = Self::chat_screen(this.session.clone(), window, cx);
                this.show(chat, cx);
            });

        (Screen::Login(login), vec![subscription])
    }

    fn chat_screen(
        session: Arc<SessionManager>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> (Screen, Vec<Subscription>) {
        let chat = cx.new(|cx| ChatView::new(session, window, cx));
        let notices = cx.subscribe_in(&chat, window, |this, _, event: &NoticeRaised, window, cx| {
            this.push_notice(&event.notice, window, cx);
        });
        let logout = cx.subscribe_in(&chat, window, |this, _, _: &LogoutRequested, window, cx| {
            this.logout(window, cx);
        });

        (Screen::Chat(chat), vec![notices, logout])
    }

    fn show(&mut self, (screen, subscriptions): (Screen, Vec<Subscription>), cx: &mut Context<Self>) {
        self.screen = screen;
        self._subscriptions = subscriptions;
        cx.notify();
    }

    fn logout(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let session = self.session.clone();
        Tokio::spawn(cx, async move { session.logout().await }).detach();
        let login = Self::login_screen(self.session.clone(), window, cx);
        self.show(login, cx);
    }

    fn refresh(&mut self, _: &Refresh, _window: &mut Window, cx: &mut Context<Self>) {
        if let Screen::Chat(chat) = &self.screen {
            chat.update(cx, |chat, cx| chat.reload(cx));
        }
    }

    fn push_notice(&mut self, notice: &Notice, window: &mut Window, cx: &mut Context<Self>) {
        let mut notification = match notice.level {
            NoticeLevel::Error => Notification::error(notice.title.clone()),
            NoticeLevel::Success => Notification::success(notice.title.clone()),
        };
        if let Some(description) = &notice.description {
            notification = notification
                .title(notice.title.clone())
                .message(description.clone());
        }

        self.notification_list.update(cx, |list, cx| {
            list.push(notification, window, cx);
        });
    }
}

impl Render for ParlorShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let content = match &self.screen {
            Screen::Login(login) => login.clone().into_any_element(),
            Screen::Chat(chat) => chat.clone().into_any_element(),
        };

        div()
            .id("parlor-shell")
            .size_full()
            .relative()
            .bg(theme.background)
            .on_action(cx.listener(Self::refresh))
            .child(v_flex().size_full().child(content))
            .child(self.notification_list.clone())
    }
}
