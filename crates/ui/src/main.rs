use std::sync::Arc;

use gpui::*;
use gpui_component::Root;
use gpui_component::notification::NotificationList;
use parlor::app::{ParlorShell, Quit, Refresh};
use parlor_client::{ClientSettings, SessionManager};

fn main() {
    tracing_subscriber::fmt::init();

    let settings = ClientSettings::load();
    let backend = match parlor_api::create_backend(settings.http_config()) {
        Ok(backend) => backend,
        Err(error) => {
            tracing::error!("failed to create chat backend: {error}");
            std::process::exit(1);
        }
    };
    let session = Arc::new(SessionManager::restore(
        backend,
        Arc::new(settings.session_store()),
    ));

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_tokio_bridge::init(cx);
        gpui_component::init(cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-r", Refresh, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1100.), px(760.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("Parlor".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                // Root hosts the notification layer.
                cx.open_window(options, |window, cx| {
                    let notification_list = cx.new(|cx| NotificationList::new(window, cx));
                    let shell =
                        cx.new(|cx| ParlorShell::new(session, notification_list, window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
