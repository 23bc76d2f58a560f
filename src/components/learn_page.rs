use dioxus::prelude::*;
use tokio::sync::mpsc;

use crate::backend::models::{Content, Module, Topic};
use crate::backend::render::{format_code, format_content, format_exercises};
use crate::backend::AppCmd;
use crate::components::common::{show_tip, TipKind};
use crate::components::AppState;

#[component]
pub fn LearnComponent() -> Element {
    let mut state = use_context::<AppState>();
    let cmd_tx = use_context::<mpsc::UnboundedSender<AppCmd>>();

    let modules = state.modules.read().clone();
    let topics = state.topics.read().clone();
    let current_module = state.current_module.read().clone();
    let current_topic = state.current_topic.read().clone();
    let is_admin = state.is_admin();
    let generating = *state.generating.read();

    // Selecting a module invalidates the topic/content drill-down below it.
    let cmd_tx_module = cmd_tx.clone();
    let select_module = EventHandler::new(move |module: Module| {
        let seq = *state.topics_seq.read() + 1;
        state.topics_seq.set(seq);
        state.current_topic.set(None);
        state.content.set(None);
        let _ = cmd_tx_module.send(AppCmd::FetchTopics {
            module_id: module.id,
            seq,
        });
        state.current_module.set(Some(module));
    });

    let cmd_tx_topic = cmd_tx.clone();
    let select_topic = EventHandler::new(move |topic: Topic| {
        let seq = *state.content_seq.read() + 1;
        state.content_seq.set(seq);
        let _ = cmd_tx_topic.send(AppCmd::FetchContent {
            topic_id: topic.id,
            seq,
        });
        state.current_topic.set(Some(topic));
    });

    let cmd_tx_generate = cmd_tx.clone();
    let on_generate = move |_| {
        if !state.is_admin() {
            show_tip(state.login_tip, "只有管理员可以生成AI内容", TipKind::Error);
            return;
        }
        let topic = state.current_topic.read().clone();
        let module = state.current_module.read().clone();
        match (topic, module) {
            (Some(topic), Some(module)) => {
                state.generating.set(true);
                let _ = cmd_tx_generate.send(AppCmd::GenerateContent {
                    topic_id: topic.id,
                    topic_name: topic.title,
                    module_name: module.title,
                });
            }
            _ => show_tip(state.login_tip, "请先选择一个知识点", TipKind::Error),
        }
    };

    let selected_module_id = current_module.as_ref().map(|m| m.id);
    let selected_topic_id = current_topic.as_ref().map(|t| t.id);

    rsx! {
        div { class: "page-container py-8",
            div { class: "page-header",
                h1 { class: "page-title", "📘 学习模块" }
            }

            div { class: "card-grid",
                for module in modules {
                    ModuleCard {
                        key: "{module.id}",
                        module: module.clone(),
                        selected: selected_module_id == Some(module.id),
                        on_select: select_module,
                    }
                }
            }

            if let Some(module) = current_module {
                section { class: "panel mt-6",
                    h2 { class: "panel-title", "📝 {module.title} · 知识点" }
                    div { class: "card-grid",
                        for topic in topics {
                            TopicCard {
                                key: "{topic.id}",
                                topic: topic.clone(),
                                selected: selected_topic_id == Some(topic.id),
                                on_select: select_topic,
                            }
                        }
                    }
                }
            }

            if let Some(topic) = current_topic {
                section { class: "panel mt-6",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "{topic.title}" }
                        button {
                            class: "btn btn-primary",
                            disabled: !is_admin || generating,
                            onclick: on_generate,
                            if generating { "🔄 生成中..." } else { "✨ AI扩写内容" }
                        }
                    }
                    ContentCards { is_admin: is_admin }
                }
            }
        }
    }
}

#[component]
fn ModuleCard(module: Module, selected: bool, on_select: EventHandler<Module>) -> Element {
    let description = module
        .description
        .clone()
        .unwrap_or_else(|| "探索这个模块的核心概念和实践应用".to_string());
    let topic_count = module.topic_count();
    let minutes = module.estimated_minutes();
    let class = if selected {
        "module-card selected"
    } else {
        "module-card"
    };
    let module_clone = module.clone();

    rsx! {
        div {
            class: "{class}",
            onclick: move |_| on_select.call(module_clone.clone()),
            h3 { "{module.title}" }
            p { "{description}" }
            div { class: "card-meta",
                span { "📚 {topic_count} 个知识点" }
                span { "⏱️ 预计 {minutes} 分钟" }
            }
        }
    }
}

#[component]
fn TopicCard(topic: Topic, selected: bool, on_select: EventHandler<Topic>) -> Element {
    let description = topic
        .description
        .clone()
        .unwrap_or_else(|| "深入了解这个重要概念".to_string());
    let class = if selected {
        "topic-card selected"
    } else {
        "topic-card"
    };
    let topic_clone = topic.clone();

    rsx! {
        div {
            class: "{class}",
            onclick: move |_| on_select.call(topic_clone.clone()),
            h4 { "{topic.title}" }
            p { "{description}" }
        }
    }
}

/// The four fixed content cards, or the single "start learning" placeholder
/// when the topic has no content yet. Card bodies are pre-rendered HTML; the
/// text fields are escaped in `backend::render`, the code field is raw by
/// choice.
#[component]
fn ContentCards(is_admin: bool) -> Element {
    let state = use_context::<AppState>();
    let content = state.content.read().clone();

    let cards = match content {
        Some(ref c) if !c.is_empty() => content_cards(c),
        _ => {
            let hint = if is_admin {
                "管理员可以点击\"AI扩写内容\"来生成学习材料。"
            } else {
                ""
            };
            vec![(
                "📖 开始学习".to_string(),
                format!("<p>这个知识点的详细内容正在准备中。{hint}</p>"),
            )]
        }
    };

    rsx! {
        div { class: "content-cards",
            for (title, body) in cards {
                div { class: "content-card",
                    h4 { "{title}" }
                    div { class: "content-body", dangerous_inner_html: "{body}" }
                }
            }
        }
    }
}

fn content_cards(content: &Content) -> Vec<(String, String)> {
    let text_card = |text: &Option<String>, placeholder: &str| {
        text.as_deref()
            .filter(|t| !t.is_empty())
            .map(format_content)
            .unwrap_or_else(|| format!("<p>{placeholder}</p>"))
    };

    vec![
        (
            "📚 理论知识".to_string(),
            text_card(&content.theory, "理论内容正在准备中..."),
        ),
        (
            "💻 代码示例".to_string(),
            content
                .code
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(format_code)
                .unwrap_or_else(|| "<p>代码示例正在准备中...</p>".to_string()),
        ),
        (
            "🔍 案例分析".to_string(),
            text_card(&content.case, "案例分析正在准备中..."),
        ),
        (
            "✏️ 练习题".to_string(),
            content
                .exercises
                .as_ref()
                .map(format_exercises)
                .unwrap_or_else(|| "<p>练习题正在准备中...</p>".to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::Exercises;

    #[test]
    fn full_content_renders_four_cards() {
        let content = Content {
            theory: Some("基础\n\n进阶".into()),
            code: Some("print('hi')".into()),
            case: Some("案例".into()),
            exercises: Some(Exercises::List(vec!["q1".into(), "q2".into()])),
        };
        let cards = content_cards(&content);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].1, "<p>基础</p><p>进阶</p>");
        assert_eq!(cards[1].1, "<pre><code>print('hi')</code></pre>");
        assert!(cards[3].1.starts_with("<p><strong>1. </strong>q1</p>"));
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let content = Content {
            theory: Some("".into()),
            ..Content::default()
        };
        let cards = content_cards(&content);
        assert_eq!(cards[0].1, "<p>理论内容正在准备中...</p>");
        assert_eq!(cards[1].1, "<p>代码示例正在准备中...</p>");
        assert_eq!(cards[2].1, "<p>案例分析正在准备中...</p>");
        assert_eq!(cards[3].1, "<p>练习题正在准备中...</p>");
    }
}
