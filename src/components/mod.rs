pub mod admin_page;
pub mod common;
pub mod exam_page;
pub mod learn_page;
pub mod nav_bar;
pub mod profile_page;

use dioxus::prelude::*;
use tokio::sync::mpsc;

use crate::backend::models::{
    Content, Exam, HistoryRecord, Module, SubmitResult, Topic, User,
};
use crate::backend::{AppCmd, AppEvent};
use common::{show_tip, Tip, TipKind};

/// The four top-level pages. The shell renders exactly the component for the
/// current variant, so one page is visible and one tab active at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Learn,
    Profile,
    Exam,
    Admin,
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub page: Signal<Page>,
    pub session: Signal<Option<User>>,

    // Learning navigator: module -> topic -> content drill-down. The seq
    // counters stamp each topics/content request; a response is applied only
    // if its stamp still matches the latest issued one.
    pub modules: Signal<Vec<Module>>,
    pub current_module: Signal<Option<Module>>,
    pub topics: Signal<Vec<Topic>>,
    pub current_topic: Signal<Option<Topic>>,
    pub content: Signal<Option<Content>>,
    pub topics_seq: Signal<u64>,
    pub content_seq: Signal<u64>,
    pub generating: Signal<bool>,

    // Exam runner
    pub exams: Signal<Vec<Exam>>,
    pub active_exam: Signal<Option<Exam>>,
    pub answers: Signal<Vec<String>>,
    pub exam_result: Signal<Option<SubmitResult>>,

    pub history: Signal<Vec<HistoryRecord>>,

    // Admin import. `import_gen` keys the file input; it is bumped when an
    // import succeeds so the picker remounts empty.
    pub import_file: Signal<Option<(String, Vec<u8>)>>,
    pub import_gen: Signal<u64>,

    // Transient notifications, auto-cleared after three seconds
    pub login_tip: Signal<Option<Tip>>,
    pub import_tip: Signal<Option<Tip>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: use_signal(|| Page::Learn),
            session: use_signal(|| None),
            modules: use_signal(|| vec![]),
            current_module: use_signal(|| None),
            topics: use_signal(|| vec![]),
            current_topic: use_signal(|| None),
            content: use_signal(|| None),
            topics_seq: use_signal(|| 0),
            content_seq: use_signal(|| 0),
            generating: use_signal(|| false),
            exams: use_signal(|| vec![]),
            active_exam: use_signal(|| None),
            answers: use_signal(|| vec![]),
            exam_result: use_signal(|| None),
            history: use_signal(|| vec![]),
            import_file: use_signal(|| None),
            import_gen: use_signal(|| 0),
            login_tip: use_signal(|| None),
            import_tip: use_signal(|| None),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .map(|u| u.is_admin())
            .unwrap_or(false)
    }
}

/// Applies worker events to the shared signals, following up with the chained
/// fetches the flow requires (history after login/submit, content re-fetch
/// after generation).
pub fn apply_event(mut state: AppState, cmd_tx: &mpsc::UnboundedSender<AppCmd>, event: AppEvent) {
    match event {
        AppEvent::ModulesFetched(modules) => state.modules.set(modules),
        AppEvent::TopicsFetched { seq, topics } => {
            if seq == *state.topics_seq.read() {
                state.topics.set(topics);
            }
        }
        AppEvent::ContentFetched { seq, content } => {
            if seq == *state.content_seq.read() {
                state.content.set(Some(content));
            }
        }
        AppEvent::GenerateFinished { topic_id, result } => {
            state.generating.set(false);
            match result {
                Ok(()) => {
                    let seq = *state.content_seq.read() + 1;
                    state.content_seq.set(seq);
                    let _ = cmd_tx.send(AppCmd::FetchContent { topic_id, seq });
                    show_tip(
                        state.login_tip,
                        "✨ AI内容生成成功！内容已保存，刷新页面不会重新生成。",
                        TipKind::Success,
                    );
                }
                Err(msg) => show_tip(state.login_tip, msg, TipKind::Error),
            }
        }
        AppEvent::LoginSucceeded(user) => {
            let welcome = format!("欢迎，{}！", user.name);
            state.session.set(Some(user));
            show_tip(state.login_tip, welcome, TipKind::Success);
            let _ = cmd_tx.send(AppCmd::FetchMyScores);
        }
        AppEvent::LoginFailed(msg) => show_tip(state.login_tip, msg, TipKind::Error),
        AppEvent::ScoresFetched(records) => state.history.set(records),
        AppEvent::ExamsFetched(exams) => state.exams.set(exams),
        AppEvent::ExamSubmitted(result) => {
            state.exam_result.set(Some(result));
            // History is a per-user view; without a session there is nothing
            // to refresh.
            if state.session.read().is_some() {
                let _ = cmd_tx.send(AppCmd::FetchMyScores);
            }
        }
        AppEvent::ExamSubmitFailed(msg) => show_tip(state.login_tip, msg, TipKind::Error),
        AppEvent::ImportFinished(result) => match result {
            Ok(count) => {
                state.import_file.set(None);
                let gen = *state.import_gen.read() + 1;
                state.import_gen.set(gen);
                show_tip(
                    state.import_tip,
                    format!("成功导入 {} 名学生", count),
                    TipKind::Success,
                );
            }
            Err(msg) => show_tip(state.import_tip, msg, TipKind::Error),
        },
    }
}

pub async fn pump_events(
    mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
    state: AppState,
    cmd_tx: mpsc::UnboundedSender<AppCmd>,
) {
    while let Some(event) = event_rx.recv().await {
        apply_event(state, &cmd_tx, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::{Role, SubmitResult};

    // `AppState::new` needs a live scope, so each test runs its body as a
    // throwaway component rendered once.
    fn render_once(app: fn() -> Element) {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }

    fn student() -> User {
        User {
            username: "a1".into(),
            name: "Ann".into(),
            role: Role::Student,
        }
    }

    #[test]
    fn stale_topic_and_content_responses_are_discarded() {
        fn app() -> Element {
            let mut state = AppState::new();
            let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();

            let topic = Topic {
                id: 1,
                title: "HDFS".into(),
                description: None,
            };

            // A response stamped before the latest selection is dropped.
            state.topics_seq.set(2);
            apply_event(
                state,
                &cmd_tx,
                AppEvent::TopicsFetched {
                    seq: 1,
                    topics: vec![topic.clone()],
                },
            );
            assert!(state.topics.read().is_empty());

            apply_event(
                state,
                &cmd_tx,
                AppEvent::TopicsFetched {
                    seq: 2,
                    topics: vec![topic],
                },
            );
            assert_eq!(state.topics.read().len(), 1);

            state.content_seq.set(3);
            apply_event(
                state,
                &cmd_tx,
                AppEvent::ContentFetched {
                    seq: 2,
                    content: Content {
                        theory: Some("stale".into()),
                        ..Content::default()
                    },
                },
            );
            assert!(state.content.read().is_none());

            apply_event(
                state,
                &cmd_tx,
                AppEvent::ContentFetched {
                    seq: 3,
                    content: Content::default(),
                },
            );
            assert!(state.content.read().is_some());
            rsx! {}
        }
        render_once(app);
    }

    #[test]
    fn submitted_exam_refreshes_history_only_with_a_session() {
        fn app() -> Element {
            let mut state = AppState::new();
            let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
            let result = SubmitResult { score: 3, total: 4 };

            apply_event(state, &cmd_tx, AppEvent::ExamSubmitted(result));
            assert_eq!(*state.exam_result.read(), Some(result));
            assert!(cmd_rx.try_recv().is_err());

            state.session.set(Some(student()));
            apply_event(state, &cmd_tx, AppEvent::ExamSubmitted(result));
            assert!(matches!(cmd_rx.try_recv(), Ok(AppCmd::FetchMyScores)));
            rsx! {}
        }
        render_once(app);
    }

    #[test]
    fn successful_import_clears_the_picked_file_and_rekeys_the_input() {
        fn app() -> Element {
            let mut state = AppState::new();
            let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
            state
                .import_file
                .set(Some(("students.xlsx".into(), vec![1, 2])));

            apply_event(state, &cmd_tx, AppEvent::ImportFinished(Ok(3)));
            assert!(state.import_file.read().is_none());
            assert_eq!(*state.import_gen.read(), 1);
            assert_eq!(
                state.import_tip.read().as_ref().map(|t| t.text.clone()),
                Some("成功导入 3 名学生".to_string())
            );

            // A failed import keeps the picker as-is.
            apply_event(
                state,
                &cmd_tx,
                AppEvent::ImportFinished(Err("导入失败".into())),
            );
            assert_eq!(*state.import_gen.read(), 1);
            rsx! {}
        }
        render_once(app);
    }
}
