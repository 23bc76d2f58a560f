use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Top-level subject grouping. The `topics` field is only populated when the
/// backend inlines them in the module list; the cards fall back to a nominal
/// count of five when it is absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
}

impl Module {
    pub fn topic_count(&self) -> usize {
        match &self.topics {
            Some(topics) if !topics.is_empty() => topics.len(),
            _ => 5,
        }
    }

    /// Rough reading time shown on the module card, 15 minutes per topic.
    pub fn estimated_minutes(&self) -> usize {
        self.topic_count() * 15
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Exercises arrive from the backend either as an ordered list of prompts or
/// as one free-form text blob. The variant is resolved once here, at the
/// serde boundary, instead of type-sniffing at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exercises {
    List(Vec<String>),
    Text(String),
}

/// The theory/code/case/exercises payload for one topic. Every field is
/// optional; an entirely empty object is how the backend says "nothing
/// written yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub theory: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub case: Option<String>,
    #[serde(default, alias = "exercise")]
    pub exercises: Option<Exercises>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.theory.is_none() && self.code.is_none() && self.case.is_none() && self.exercises.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Choice,
    Text,
}

// Anything that is not a choice question renders as free text.
impl<'de> Deserialize<'de> for QuestionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(match kind.as_str() {
            "choice" => QuestionKind::Choice,
            _ => QuestionKind::Text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub name: String,
    pub questions: Vec<Question>,
}

impl Exam {
    /// One empty slot per question; unanswered questions are submitted as
    /// empty strings, never dropped.
    pub fn answer_sheet(&self) -> Vec<String> {
        vec![String::new(); self.questions.len()]
    }

    /// Answers ordered by question index, padded or truncated to exactly the
    /// question count.
    pub fn padded_answers(&self, answers: &[String]) -> Vec<String> {
        (0..self.questions.len())
            .map(|i| answers.get(i).cloned().unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::Student => "学生",
        }
    }
}

/// The logged-in identity. Held only in memory, never persisted and never
/// echoed back to the backend outside the submit payload's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub topic_id: i64,
    pub topic_name: String,
    pub module_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub exam_id: i64,
    pub username: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubmitResult {
    pub score: u32,
    pub total: u32,
}

impl SubmitResult {
    pub fn percent(&self) -> u32 {
        percent(self.score, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub exam_name: String,
    pub score: u32,
    pub total: u32,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn percent(&self) -> u32 {
        percent(self.score, self.total)
    }

    /// Timestamps come back as RFC 3339; anything else is shown verbatim.
    pub fn timestamp_display(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Rounded percentage as displayed next to every score.
pub fn percent(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercises_deserialize_from_list_and_text() {
        let list: Exercises = serde_json::from_str(r#"["q1","q2"]"#).unwrap();
        assert_eq!(list, Exercises::List(vec!["q1".into(), "q2".into()]));

        let text: Exercises = serde_json::from_str(r#""q1\nq2""#).unwrap();
        assert_eq!(text, Exercises::Text("q1\nq2".into()));
    }

    #[test]
    fn content_accepts_exercise_alias() {
        let content: Content = serde_json::from_str(r#"{"exercise": "do this"}"#).unwrap();
        assert_eq!(content.exercises, Some(Exercises::Text("do this".into())));
    }

    #[test]
    fn empty_content_object_is_empty() {
        let content: Content = serde_json::from_str("{}").unwrap();
        assert!(content.is_empty());

        let content: Content = serde_json::from_str(r#"{"theory": "t"}"#).unwrap();
        assert!(!content.is_empty());
    }

    #[test]
    fn unknown_question_type_falls_back_to_text() {
        let q: Question =
            serde_json::from_str(r#"{"question": "?", "type": "essay"}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::Text);
        assert!(q.options.is_empty());

        let q: Question = serde_json::from_str(
            r#"{"question": "?", "type": "choice", "options": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(q.kind, QuestionKind::Choice);
        assert_eq!(q.options.len(), 2);
    }

    #[test]
    fn score_percent_rounds() {
        assert_eq!(percent(3, 4), 75);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(0, 0), 0);
    }

    fn exam_with_questions(n: usize) -> Exam {
        Exam {
            id: 1,
            name: "期末".into(),
            questions: (0..n)
                .map(|i| Question {
                    question: format!("q{i}"),
                    kind: QuestionKind::Text,
                    options: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn unanswered_questions_submit_as_empty_strings() {
        let exam = exam_with_questions(3);
        let padded = exam.padded_answers(&["0".to_string()]);
        assert_eq!(padded, vec!["0".to_string(), String::new(), String::new()]);
        assert_eq!(exam.answer_sheet().len(), 3);
    }

    #[test]
    fn submit_request_keeps_answer_order() {
        let req = SubmitRequest {
            exam_id: 7,
            username: "a1".into(),
            answers: vec!["1".into(), "".into(), "自由作答".into()],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["exam_id"], 7);
        assert_eq!(json["answers"][1], "");
        assert_eq!(json["answers"][2], "自由作答");
    }

    #[test]
    fn login_failure_payload_carries_server_error() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"success": false, "error": "账号或密码不正确"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.user.is_none());
        assert_eq!(resp.error.as_deref(), Some("账号或密码不正确"));

        let resp: LoginResponse = serde_json::from_str(
            r#"{"success": true, "user": {"username": "a1", "name": "Ann", "role": "student"}}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.user.unwrap().role.label(), "学生");
    }

    #[test]
    fn history_record_percent_and_timestamp() {
        let record: HistoryRecord = serde_json::from_str(
            r#"{"exam_name": "模拟考", "score": 3, "total": 4, "timestamp": "2024-05-01T09:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.percent(), 75);
        assert_eq!(record.timestamp_display(), "2024-05-01 09:30:00");

        let record = HistoryRecord {
            exam_name: "x".into(),
            score: 1,
            total: 2,
            timestamp: "昨天".into(),
        };
        assert_eq!(record.timestamp_display(), "昨天");
    }

    #[test]
    fn module_card_metadata_defaults() {
        let module: Module = serde_json::from_str(r#"{"id": 1, "title": "Hadoop"}"#).unwrap();
        assert_eq!(module.topic_count(), 5);
        assert_eq!(module.estimated_minutes(), 75);

        let module: Module = serde_json::from_str(
            r#"{"id": 1, "title": "Hadoop", "topics": [{"id": 1, "title": "HDFS"}]}"#,
        )
        .unwrap();
        assert_eq!(module.topic_count(), 1);
        assert_eq!(module.estimated_minutes(), 15);

        let module: Module =
            serde_json::from_str(r#"{"id": 1, "title": "Hadoop", "topics": []}"#).unwrap();
        assert_eq!(module.topic_count(), 5);
    }
}
