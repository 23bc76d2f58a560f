use dioxus::prelude::*;
use tokio::sync::mpsc;

use crate::backend::AppCmd;
use crate::components::common::{show_tip, TipKind, TipView};
use crate::components::AppState;

#[component]
pub fn ProfileComponent() -> Element {
    let mut state = use_context::<AppState>();
    let cmd_tx = use_context::<mpsc::UnboundedSender<AppCmd>>();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);

    let session = state.session.read().clone();
    let history = state.history.read().clone();

    let cmd_tx_login = cmd_tx.clone();
    let on_login = move |_| {
        let id = username.read().trim().to_string();
        let pw = password.read().trim().to_string();
        if id.is_empty() || pw.is_empty() {
            show_tip(state.login_tip, "请输入用户名和密码", TipKind::Error);
            return;
        }
        let _ = cmd_tx_login.send(AppCmd::Login {
            username: id,
            password: pw,
        });
    };

    // Pure client-side reset; the backend holds no session to invalidate.
    let on_logout = move |_| {
        state.session.set(None);
        state.history.set(vec![]);
        show_tip(state.login_tip, "已退出登录", TipKind::Info);
    };

    rsx! {
        div { class: "page-container py-8",
            div { class: "page-header",
                h1 { class: "page-title", "👤 个人中心" }
            }

            if let Some(user) = session {
                {
                    let role_label = user.role.label();
                    rsx! {
                        div { class: "panel",
                            div { class: "panel-header",
                                h2 { class: "panel-title", "我的信息" }
                                button { class: "btn btn-secondary", onclick: on_logout, "退出登录" }
                            }
                            p { strong { "姓名：" } "{user.name}" }
                            p { strong { "角色：" } "{role_label}" }
                            p { strong { "学号：" } "{user.username}" }
                        }

                        div { class: "panel mt-6",
                            h2 { class: "panel-title", "学习记录" }
                            if history.is_empty() {
                                p { class: "empty-text", "暂无学习记录" }
                            } else {
                                for (i, record) in history.iter().enumerate() {
                                    {
                                        let percent = record.percent();
                                        let time = record.timestamp_display();
                                        rsx! {
                                            div { key: "{i}", class: "history-item",
                                                h4 { "{record.exam_name}" }
                                                p { "得分：{record.score}/{record.total} ({percent}%)" }
                                                p { "时间：{time}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                div { class: "panel auth-box",
                    h2 { class: "panel-title", "登录" }
                    div { class: "form-group",
                        label { class: "form-label", "学号 / 用户名" }
                        input {
                            class: "input",
                            placeholder: "请输入学号或用户名",
                            value: "{username}",
                            oninput: move |e| username.set(e.value())
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "密码" }
                        input {
                            class: "input",
                            "type": "password",
                            placeholder: "请输入密码",
                            value: "{password}",
                            oninput: move |e| password.set(e.value())
                        }
                    }
                    button { class: "btn btn-primary", onclick: on_login, "登录" }
                }
            }

            TipView { slot: state.login_tip }
        }
    }
}
