//! Login and signup view state. Auth failures stay inline in the owning
//! view (an error line under the form) instead of going through the
//! notifier; only the login flow touches the session store.

use std::sync::Arc;

use shared::protocol::{LoginResponse, SignupResponse};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{NavIntent, QuizApi, Session, SessionStore};

#[derive(Default)]
struct AuthState {
    username: String,
    password: String,
    error: Option<String>,
    is_loading: bool,
}

pub struct LoginViewController {
    api: Arc<dyn QuizApi>,
    sessions: Arc<dyn SessionStore>,
    inner: Mutex<AuthState>,
}

impl LoginViewController {
    pub fn new(api: Arc<dyn QuizApi>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            sessions,
            inner: Mutex::new(AuthState::default()),
        }
    }

    /// A confirmed login persists the issued token and user before the
    /// dashboard intent is returned. A response flagged successful but
    /// missing its token/user pair counts as invalid credentials rather
    /// than persisting a partial session.
    pub async fn submit(&self) -> Option<NavIntent> {
        let (username, password) = {
            let mut inner = self.inner.lock().await;
            if inner.is_loading {
                return None;
            }
            inner.is_loading = true;
            inner.error = None;
            (inner.username.clone(), inner.password.clone())
        };

        let result = self.api.login(&username, &password).await;

        let mut inner = self.inner.lock().await;
        inner.is_loading = false;
        match result {
            Ok(LoginResponse {
                success: true,
                token: Some(token),
                user: Some(user),
            }) => {
                if let Err(err) = self.sessions.save(&Session { token, user }) {
                    warn!(error = %err, "failed to persist session after login");
                }
                Some(NavIntent::ToDashboard)
            }
            Ok(_) => {
                inner.error = Some("Invalid username or password".to_string());
                None
            }
            Err(err) => {
                warn!(error = %err, "login request failed");
                inner.error = Some("Login failed. Please try again.".to_string());
                None
            }
        }
    }

    pub async fn set_username(&self, username: impl Into<String>) {
        self.inner.lock().await.username = username.into();
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        self.inner.lock().await.password = password.into();
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.is_loading
    }
}

pub struct SignupViewController {
    api: Arc<dyn QuizApi>,
    inner: Mutex<AuthState>,
}

impl SignupViewController {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(AuthState::default()),
        }
    }

    /// Signup creates no session; a confirmed signup just navigates on to
    /// the dashboard and leaves logging in to the login flow.
    pub async fn submit(&self) -> Option<NavIntent> {
        let (username, password) = {
            let mut inner = self.inner.lock().await;
            if inner.is_loading {
                return None;
            }
            inner.is_loading = true;
            inner.error = None;
            (inner.username.clone(), inner.password.clone())
        };

        let result = self.api.signup(&username, &password).await;

        let mut inner = self.inner.lock().await;
        inner.is_loading = false;
        match result {
            Ok(SignupResponse { success: true, .. }) => Some(NavIntent::ToDashboard),
            Ok(SignupResponse { message, .. }) => {
                inner.error =
                    Some(message.unwrap_or_else(|| "Signup failed. Try again.".to_string()));
                None
            }
            Err(err) => {
                warn!(error = %err, "signup request failed");
                inner.error = Some("Signup failed. Try again.".to_string());
                None
            }
        }
    }

    pub async fn set_username(&self, username: impl Into<String>) {
        self.inner.lock().await.username = username.into();
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        self.inner.lock().await.password = password.into();
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.is_loading
    }
}
