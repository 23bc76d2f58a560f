pub mod api;
pub mod models;
pub mod render;

use api::ApiClient;
use models::{
    Content, Exam, GenerateRequest, HistoryRecord, LoginRequest, Module, SubmitRequest,
    SubmitResult, Topic, User,
};
use tokio::sync::mpsc;
use tracing::{error, info};

pub const NETWORK_ERROR_TIP: &str = "网络错误，请稍后重试";

/// One command per user action. Navigation-level fetches carry the sequence
/// number stamped by the UI so stale responses can be discarded.
#[derive(Debug)]
pub enum AppCmd {
    FetchModules,
    FetchTopics { module_id: i64, seq: u64 },
    FetchContent { topic_id: i64, seq: u64 },
    GenerateContent { topic_id: i64, topic_name: String, module_name: String },
    Login { username: String, password: String },
    FetchMyScores,
    FetchExams,
    SubmitExam { exam_id: i64, username: String, answers: Vec<String> },
    ImportStudents { filename: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ModulesFetched(Vec<Module>),
    TopicsFetched { seq: u64, topics: Vec<Topic> },
    ContentFetched { seq: u64, content: Content },
    GenerateFinished { topic_id: i64, result: Result<(), String> },
    LoginSucceeded(User),
    LoginFailed(String),
    ScoresFetched(Vec<HistoryRecord>),
    ExamsFetched(Vec<Exam>),
    ExamSubmitted(SubmitResult),
    ExamSubmitFailed(String),
    ImportFinished(Result<u32, String>),
}

/// Sequential fetch-then-emit worker. Each command is handled to completion
/// before the next is taken, so at most one request is in flight; overlap
/// races are resolved by the sequence stamps, not by cancellation.
pub struct ApiWorker {
    client: ApiClient,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ApiWorker {
    pub fn new(
        client: ApiClient,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            client,
            cmd_rx,
            event_tx,
        }
    }

    pub async fn run(&mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_command(cmd).await;
        }
    }

    async fn handle_command(&mut self, cmd: AppCmd) {
        match cmd {
            AppCmd::FetchModules => match self.client.modules().await {
                Ok(modules) => {
                    info!(count = modules.len(), "modules loaded");
                    let _ = self.event_tx.send(AppEvent::ModulesFetched(modules));
                }
                // Load failures leave the prior UI untouched.
                Err(e) => error!("failed to load modules: {e:?}"),
            },
            AppCmd::FetchTopics { module_id, seq } => match self.client.topics(module_id).await {
                Ok(topics) => {
                    let _ = self.event_tx.send(AppEvent::TopicsFetched { seq, topics });
                }
                Err(e) => error!(module_id, "failed to load topics: {e:?}"),
            },
            AppCmd::FetchContent { topic_id, seq } => match self.client.content(topic_id).await {
                Ok(content) => {
                    let _ = self.event_tx.send(AppEvent::ContentFetched { seq, content });
                }
                Err(e) => error!(topic_id, "failed to load content: {e:?}"),
            },
            AppCmd::GenerateContent { topic_id, topic_name, module_name } => {
                let request = GenerateRequest {
                    topic_id,
                    topic_name,
                    module_name,
                };
                let result = match self.client.generate_topic(&request).await {
                    Ok(resp) if resp.success => Ok(()),
                    Ok(resp) => Err(resp.error.unwrap_or_else(|| "AI生成失败".to_string())),
                    Err(e) => {
                        error!(topic_id, "generate request failed: {e:?}");
                        Err(NETWORK_ERROR_TIP.to_string())
                    }
                };
                let _ = self
                    .event_tx
                    .send(AppEvent::GenerateFinished { topic_id, result });
            }
            AppCmd::Login { username, password } => {
                let request = LoginRequest { username, password };
                let event = match self.client.login(&request).await {
                    Ok(resp) => match (resp.success, resp.user) {
                        (true, Some(user)) => AppEvent::LoginSucceeded(user),
                        _ => AppEvent::LoginFailed(
                            resp.error.unwrap_or_else(|| "登录失败".to_string()),
                        ),
                    },
                    Err(e) => {
                        error!("login request failed: {e:?}");
                        AppEvent::LoginFailed(NETWORK_ERROR_TIP.to_string())
                    }
                };
                let _ = self.event_tx.send(event);
            }
            AppCmd::FetchMyScores => match self.client.my_scores().await {
                Ok(records) => {
                    let _ = self.event_tx.send(AppEvent::ScoresFetched(records));
                }
                Err(e) => error!("failed to load score history: {e:?}"),
            },
            AppCmd::FetchExams => match self.client.exams().await {
                Ok(exams) => {
                    info!(count = exams.len(), "exams loaded");
                    let _ = self.event_tx.send(AppEvent::ExamsFetched(exams));
                }
                Err(e) => error!("failed to load exams: {e:?}"),
            },
            AppCmd::SubmitExam { exam_id, username, answers } => {
                let request = SubmitRequest {
                    exam_id,
                    username,
                    answers,
                };
                let event = match self.client.submit_exam(&request).await {
                    Ok(result) => AppEvent::ExamSubmitted(result),
                    Err(e) => {
                        error!(exam_id, "exam submit failed: {e:?}");
                        AppEvent::ExamSubmitFailed("提交失败，请稍后重试".to_string())
                    }
                };
                let _ = self.event_tx.send(event);
            }
            AppCmd::ImportStudents { filename, bytes } => {
                let result = match self.client.import_students(filename, bytes).await {
                    Ok(resp) if resp.success => Ok(resp.count.unwrap_or(0)),
                    Ok(resp) => Err(resp.error.unwrap_or_else(|| "导入失败".to_string())),
                    Err(e) => {
                        error!("student import failed: {e:?}");
                        Err(NETWORK_ERROR_TIP.to_string())
                    }
                };
                let _ = self.event_tx.send(AppEvent::ImportFinished(result));
            }
        }
    }
}

pub async fn init(
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let client = ApiClient::new();
    let mut worker = ApiWorker::new(client, cmd_rx, event_tx);
    worker.run().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Nothing listens on this port; every request fails at the transport
    // layer, which is the branch these tests exercise.
    fn unreachable_worker() -> (
        mpsc::UnboundedSender<AppCmd>,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let client = ApiClient::with_base("http://127.0.0.1:9/api");
        let mut worker = ApiWorker::new(client, cmd_rx, event_tx);
        tokio::spawn(async move {
            worker.run().await;
        });
        (cmd_tx, event_rx)
    }

    #[tokio::test]
    async fn failed_loads_emit_no_event_but_login_surfaces_error() {
        let (cmd_tx, mut event_rx) = unreachable_worker();

        cmd_tx.send(AppCmd::FetchModules).unwrap();
        cmd_tx
            .send(AppCmd::Login {
                username: "a1".into(),
                password: "pw".into(),
            })
            .unwrap();

        // The silent module load must not produce an event; the first thing
        // out of the channel is the login failure.
        let event = tokio::time::timeout(Duration::from_secs(10), event_rx.recv())
            .await
            .expect("timed out waiting for login event")
            .expect("event channel closed");
        match event {
            AppEvent::LoginFailed(msg) => assert_eq!(msg, NETWORK_ERROR_TIP),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_failure_is_surfaced() {
        let (cmd_tx, mut event_rx) = unreachable_worker();

        cmd_tx
            .send(AppCmd::SubmitExam {
                exam_id: 1,
                username: "a1".into(),
                answers: vec![String::new()],
            })
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(10), event_rx.recv())
            .await
            .expect("timed out waiting for submit event")
            .expect("event channel closed");
        assert!(matches!(event, AppEvent::ExamSubmitFailed(_)));
    }
}
