//! Thin client over the portal's HTTP JSON API. One request per method, no
//! retries, no auth headers; the session lives entirely in the UI layer.

use reqwest::multipart;

use crate::backend::models::{
    Content, Exam, GenerateRequest, GenerateResponse, HistoryRecord, ImportResponse, LoginRequest,
    LoginResponse, Module, SubmitRequest, SubmitResult, Topic,
};

pub const DEFAULT_API_BASE: &str = "http://localhost:90/api";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base(option_env!("EDU_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: reqwest::Client::new(),
        }
    }

    fn cache_bust() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    pub async fn modules(&self) -> Result<Vec<Module>, reqwest::Error> {
        self.http
            .get(format!("{}/modules", self.base))
            .query(&[("_t", Self::cache_bust())])
            .send()
            .await?
            .json()
            .await
    }

    pub async fn topics(&self, module_id: i64) -> Result<Vec<Topic>, reqwest::Error> {
        self.http
            .get(format!("{}/modules/{}/topics", self.base, module_id))
            .query(&[("_t", Self::cache_bust())])
            .send()
            .await?
            .json()
            .await
    }

    pub async fn content(&self, topic_id: i64) -> Result<Content, reqwest::Error> {
        self.http
            .get(format!("{}/topics/{}/content", self.base, topic_id))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn generate_topic(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, reqwest::Error> {
        self.http
            .post(format!("{}/generate/topic/{}", self.base, request.topic_id))
            .json(request)
            .send()
            .await?
            .json()
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, reqwest::Error> {
        self.http
            .post(format!("{}/auth/login", self.base))
            .json(request)
            .send()
            .await?
            .json()
            .await
    }

    pub async fn my_scores(&self) -> Result<Vec<HistoryRecord>, reqwest::Error> {
        self.http
            .get(format!("{}/my/scores", self.base))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn exams(&self) -> Result<Vec<Exam>, reqwest::Error> {
        self.http
            .get(format!("{}/exams", self.base))
            .send()
            .await?
            .json()
            .await
    }

    pub async fn submit_exam(&self, request: &SubmitRequest) -> Result<SubmitResult, reqwest::Error> {
        self.http
            .post(format!("{}/exams/{}/submit", self.base, request.exam_id))
            .json(request)
            .send()
            .await?
            .json()
            .await
    }

    pub async fn import_students(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<ImportResponse, reqwest::Error> {
        let part = multipart::Part::bytes(bytes).file_name(filename);
        let form = multipart::Form::new().part("file", part);
        self.http
            .post(format!("{}/admin/import_students", self.base))
            .multipart(form)
            .send()
            .await?
            .json()
            .await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
