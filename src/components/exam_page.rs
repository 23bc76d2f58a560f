use dioxus::prelude::*;
use tokio::sync::mpsc;

use crate::backend::models::{Question, QuestionKind};
use crate::backend::AppCmd;
use crate::components::common::{show_tip, TipKind};
use crate::components::{AppState, Page};

#[component]
pub fn ExamComponent() -> Element {
    let mut state = use_context::<AppState>();
    let cmd_tx = use_context::<mpsc::UnboundedSender<AppCmd>>();

    let exams = state.exams.read().clone();
    let active_exam = state.active_exam.read().clone();
    let exam_result = *state.exam_result.read();

    let mut selected_id = use_signal(String::new);

    let on_start = move |_| {
        if state.session.read().is_none() {
            show_tip(state.login_tip, "请先登录后再参加考试", TipKind::Error);
            state.page.set(Page::Profile);
            return;
        }
        let sel = selected_id.read().clone();
        let exams = state.exams.read();
        // The select defaults to its first option before any change event.
        let exam = if sel.is_empty() {
            exams.first().cloned()
        } else {
            exams.iter().find(|e| e.id.to_string() == sel).cloned()
        };
        drop(exams);
        if let Some(exam) = exam {
            state.answers.set(exam.answer_sheet());
            state.exam_result.set(None);
            state.active_exam.set(Some(exam));
        }
    };

    let cmd_tx_submit = cmd_tx.clone();
    let on_submit = move |_| {
        // A logout mid-exam invalidates the sheet; nothing is sent for it.
        let username = match state.session.read().as_ref() {
            Some(user) => user.username.clone(),
            None => {
                show_tip(state.login_tip, "请先登录后再参加考试", TipKind::Error);
                state.page.set(Page::Profile);
                return;
            }
        };
        let exam = state.active_exam.read().clone();
        if let Some(exam) = exam {
            let answers = exam.padded_answers(&state.answers.read());
            let _ = cmd_tx_submit.send(AppCmd::SubmitExam {
                exam_id: exam.id,
                username,
                answers,
            });
        }
    };

    rsx! {
        div { class: "page-container py-8",
            div { class: "page-header",
                h1 { class: "page-title", "📝 在线考试" }
            }

            div { class: "panel",
                div { class: "exam-picker",
                    select {
                        class: "input",
                        oninput: move |e| selected_id.set(e.value()),
                        for exam in exams.iter() {
                            option { key: "{exam.id}", value: "{exam.id}", "{exam.name}" }
                        }
                    }
                    button { class: "btn btn-primary", onclick: on_start, "开始考试" }
                }
            }

            if let Some(exam) = active_exam {
                div { class: "panel mt-6",
                    h2 { class: "panel-title", "{exam.name}" }
                    for (i, question) in exam.questions.iter().enumerate() {
                        QuestionBlock {
                            key: "{i}",
                            index: i,
                            question: question.clone(),
                        }
                    }
                    button { class: "btn btn-primary", onclick: on_submit, "提交答案" }
                }
            }

            if let Some(result) = exam_result {
                {
                    let percent = result.percent();
                    let finished = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
                    rsx! {
                        div { class: "panel mt-6 exam-result",
                            h3 { "考试结果" }
                            p { "得分：{result.score}/{result.total} ({percent}%)" }
                            p { "用时：{finished}" }
                        }
                    }
                }
            }
        }
    }
}

/// One question: radios valued by option index for choice questions, a free
/// text input otherwise. An untouched question leaves its answer slot as the
/// empty string.
#[component]
fn QuestionBlock(index: usize, question: Question) -> Element {
    let mut state = use_context::<AppState>();
    let current = state.answers.read().get(index).cloned().unwrap_or_default();
    let number = index + 1;

    rsx! {
        div { class: "question-block",
            h4 { "{number}. {question.question}" }
            if question.kind == QuestionKind::Choice {
                for (j, option) in question.options.iter().enumerate() {
                    {
                        let checked = current == j.to_string();
                        rsx! {
                            label { key: "{j}", class: "option-row",
                                input {
                                    "type": "radio",
                                    name: "q{index}",
                                    value: "{j}",
                                    checked: checked,
                                    onchange: move |_| {
                                        let mut answers = state.answers.write();
                                        if index < answers.len() {
                                            answers[index] = j.to_string();
                                        }
                                    }
                                }
                                span { "{option}" }
                            }
                        }
                    }
                }
            } else {
                input {
                    class: "input",
                    placeholder: "请输入答案",
                    value: "{current}",
                    oninput: move |e| {
                        let mut answers = state.answers.write();
                        if index < answers.len() {
                            answers[index] = e.value();
                        }
                    }
                }
            }
        }
    }
}
