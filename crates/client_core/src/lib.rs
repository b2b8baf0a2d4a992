use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use shared::{
    domain::QuizId,
    error::{ApiError, ApiException},
    protocol::{
        CreateQuizRequest, Credentials, LoginResponse, QuizDraft, QuizSummary, SignupResponse,
    },
};

pub mod config;
pub mod error;

mod auth;
mod form_view;
mod list_view;
mod session;

pub use auth::{LoginViewController, SignupViewController};
pub use error::{ApiClientError, ApiResult};
pub use form_view::{validate_draft, FormMode, FormViewController};
pub use list_view::ListViewController;
pub use session::{FileSessionStore, Session, SessionStore};

use crate::error::error_code_for_status;

/// Success/failure signal surfaced to the user. Fire-and-forget; no
/// controller ever consumes a return value from the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Route transition requested by a controller. The shell owning the
/// controller performs the transition; controllers only emit the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    ToLogin,
    ToSignup,
    ToDashboard,
    ToCreate,
    ToEdit(QuizId),
}

/// The remote quiz service as the controllers see it.
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<QuizSummary>>;
    async fn get(&self, id: QuizId) -> ApiResult<QuizSummary>;
    async fn create(&self, draft: QuizDraft, created_at: DateTime<Utc>)
        -> ApiResult<QuizSummary>;
    async fn update(&self, id: QuizId, draft: QuizDraft) -> ApiResult<QuizSummary>;
    async fn delete(&self, id: QuizId) -> ApiResult<()>;
    async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse>;
    async fn signup(&self, username: &str, password: &str) -> ApiResult<SignupResponse>;
}

pub struct HttpQuizApi {
    http: Client,
    base_url: String,
}

impl HttpQuizApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn quizzes_url(&self) -> String {
        format!("{}/api/quizzes", self.base_url)
    }

    fn quiz_url(&self, id: QuizId) -> String {
        format!("{}/api/quizzes/{}", self.base_url, id.0)
    }

    /// Turns a non-2xx response into a `Rejection`, preferring the API's
    /// own error envelope over a status-derived message when the body
    /// carries one.
    async fn ok_or_rejection(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let exception = match response.json::<ApiError>().await {
            Ok(envelope) => ApiException::from(envelope),
            Err(_) => ApiException::new(
                error_code_for_status(status),
                format!("request failed with status {status}"),
            ),
        };
        Err(ApiClientError::Rejection(exception))
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn list(&self) -> ApiResult<Vec<QuizSummary>> {
        let response = self.http.get(self.quizzes_url()).send().await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: QuizId) -> ApiResult<QuizSummary> {
        let response = self.http.get(self.quiz_url(id)).send().await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }

    async fn create(
        &self,
        draft: QuizDraft,
        created_at: DateTime<Utc>,
    ) -> ApiResult<QuizSummary> {
        let response = self
            .http
            .post(self.quizzes_url())
            .json(&CreateQuizRequest { draft, created_at })
            .send()
            .await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: QuizId, draft: QuizDraft) -> ApiResult<QuizSummary> {
        let response = self.http.put(self.quiz_url(id)).json(&draft).send().await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: QuizId) -> ApiResult<()> {
        let response = self.http.delete(self.quiz_url(id)).send().await?;
        Self::ok_or_rejection(response).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let response = self
            .http
            .post(format!("{}/api/login", self.base_url))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }

    async fn signup(&self, username: &str, password: &str) -> ApiResult<SignupResponse> {
        let response = self
            .http
            .post(format!("{}/api/signup", self.base_url))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let response = Self::ok_or_rejection(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
