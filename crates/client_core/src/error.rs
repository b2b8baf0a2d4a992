use reqwest::StatusCode;
use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiClientError>;

/// Failure of one API call. `Network` means the request produced no usable
/// response; `Rejection` means the server answered and said no. Controllers
/// collapse both into one generic user-facing notification, so the split
/// only shows up in logs and in code that inspects the rejection code.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("request transport failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server rejected request: {0}")]
    Rejection(#[from] ApiException),
}

impl ApiClientError {
    pub fn rejection_code(&self) -> Option<ErrorCode> {
        match self {
            ApiClientError::Network(_) => None,
            ApiClientError::Rejection(exception) => Some(exception.code),
        }
    }
}

pub(crate) fn error_code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::Validation,
        _ => ErrorCode::Internal,
    }
}
