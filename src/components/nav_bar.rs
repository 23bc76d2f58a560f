use dioxus::prelude::*;

use crate::components::{AppState, Page};

#[component]
pub fn NavComponent() -> Element {
    let mut state = use_context::<AppState>();
    let current = *state.page.read();
    let is_admin = state.is_admin();

    let tab_class = move |page: Page| {
        if current == page {
            "nav-tab active"
        } else {
            "nav-tab"
        }
    };

    rsx! {
        nav { class: "nav-bar",
            div { class: "page-container",
                div { class: "nav-logo",
                    span { class: "logo-text", "大数据学习平台" }
                }
                div { class: "nav-links",
                    button {
                        class: tab_class(Page::Learn),
                        onclick: move |_| state.page.set(Page::Learn),
                        "📘 学习"
                    }
                    button {
                        class: tab_class(Page::Profile),
                        onclick: move |_| state.page.set(Page::Profile),
                        "👤 我的"
                    }
                    button {
                        class: tab_class(Page::Exam),
                        onclick: move |_| state.page.set(Page::Exam),
                        "📝 考试"
                    }
                    // Visible only for an admin session; the page itself is
                    // not role-guarded.
                    if is_admin {
                        button {
                            class: tab_class(Page::Admin),
                            onclick: move |_| state.page.set(Page::Admin),
                            "⚙️ 管理"
                        }
                    }
                }
            }
        }
    }
}
