use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{QuizId, UserId};

/// Server-confirmed quiz record as returned by the collection and
/// fetch-by-id endpoints. The server assigns `id` and `created_at`;
/// neither changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// In-progress quiz record held in form state. Must pass validation
/// before it is allowed anywhere near the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuizDraft {
    #[validate(length(min = 3, message = "Quiz title must have at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must have at least 10 characters"))]
    pub description: String,
}

/// Body of the create endpoint. The creation timestamp is stamped by the
/// client on create only; the server owns any timestamp on update. The
/// field is camelCase on the wire while read models stay snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuizRequest {
    #[serde(flatten)]
    pub draft: QuizDraft,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
