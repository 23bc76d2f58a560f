mod backend;
mod components;

use backend::AppCmd;
use components::admin_page::AdminComponent;
use components::common::use_tip_autoclear;
use components::exam_page::ExamComponent;
use components::learn_page::LearnComponent;
use components::nav_bar::NavComponent;
use components::profile_page::ProfileComponent;
use components::{AppState, Page};
use dioxus::prelude::*;
use tokio::sync::mpsc;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);

    // Command channel into the API worker plus the event pump feeding results
    // back into the shared signals. Components only ever see the sender.
    let cmd_tx = use_context_provider(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCmd>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        spawn(async move {
            backend::init(cmd_rx, event_tx).await;
        });
        let pump_tx = cmd_tx.clone();
        spawn(async move {
            components::pump_events(event_rx, state, pump_tx).await;
        });
        cmd_tx
    });

    // Startup loads; everything else is fetched on selection.
    let startup_tx = cmd_tx.clone();
    use_effect(move || {
        let _ = startup_tx.send(AppCmd::FetchModules);
        let _ = startup_tx.send(AppCmd::FetchExams);
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        Shell {}
    }
}

#[component]
fn Shell() -> Element {
    let state = use_context::<AppState>();
    use_tip_autoclear(state.login_tip);
    use_tip_autoclear(state.import_tip);

    let page = *state.page.read();

    rsx! {
        div { class: "app-shell",
            NavComponent {}
            div { class: "app-content",
                match page {
                    Page::Learn => rsx! { LearnComponent {} },
                    Page::Profile => rsx! { ProfileComponent {} },
                    Page::Exam => rsx! { ExamComponent {} },
                    Page::Admin => rsx! { AdminComponent {} },
                }
            }
        }
    }
}
