//! View state behind the create/edit form: one draft, a create-vs-edit
//! mode, and the validation gate in front of the create/update calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use shared::{domain::QuizId, protocol::QuizDraft};
use tokio::sync::Mutex;
use tracing::warn;
use validator::Validate;

use crate::{NavIntent, NoticeKind, Notifier, QuizApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(QuizId),
}

/// Field name -> message mapping for a draft. Both field checks run
/// independently, so a draft can carry both errors at once.
pub fn validate_draft(draft: &QuizDraft) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    if let Err(failures) = draft.validate() {
        for (field, field_failures) in failures.field_errors() {
            if let Some(failure) = field_failures.first() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("invalid value for {field}"));
                errors.insert(field.to_string(), message);
            }
        }
    }
    errors
}

struct FormState {
    draft: QuizDraft,
    mode: FormMode,
    is_loading: bool,
    validation_errors: BTreeMap<String, String>,
}

pub struct FormViewController {
    api: Arc<dyn QuizApi>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<FormState>,
}

impl FormViewController {
    /// Create mode: empty draft, no request issued.
    pub fn create(api: Arc<dyn QuizApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            inner: Mutex::new(FormState {
                draft: QuizDraft::default(),
                mode: FormMode::Create,
                is_loading: false,
                validation_errors: BTreeMap::new(),
            }),
        }
    }

    /// Edit mode: fetches the record up front. If the fetch fails the form
    /// stays usable but starts from blank values; the failure is surfaced
    /// once through the notifier.
    pub async fn edit(api: Arc<dyn QuizApi>, notifier: Arc<dyn Notifier>, id: QuizId) -> Self {
        let controller = Self {
            api,
            notifier,
            inner: Mutex::new(FormState {
                draft: QuizDraft::default(),
                mode: FormMode::Edit(id),
                is_loading: true,
                validation_errors: BTreeMap::new(),
            }),
        };

        let result = controller.api.get(id).await;

        let mut inner = controller.inner.lock().await;
        match result {
            Ok(quiz) => {
                inner.draft = QuizDraft {
                    title: quiz.title,
                    description: quiz.description,
                };
            }
            Err(err) => {
                warn!(error = %err, quiz_id = id.0, "quiz fetch for edit failed");
                controller
                    .notifier
                    .notify(NoticeKind::Error, "Error loading quiz details.");
            }
        }
        inner.is_loading = false;
        drop(inner);

        controller
    }

    /// Validation is the sole gate before a request goes out; a draft that
    /// fails it never reaches the network. On success the caller receives
    /// the navigate-back-to-dashboard intent; on failure the draft and mode
    /// stay as they were so the user can retry without re-entering data.
    /// Returns without a request while another submit is still in flight.
    pub async fn submit(&self) -> Option<NavIntent> {
        let (draft, mode) = {
            let mut inner = self.inner.lock().await;
            if inner.is_loading {
                return None;
            }
            inner.validation_errors = validate_draft(&inner.draft);
            if !inner.validation_errors.is_empty() {
                return None;
            }
            inner.is_loading = true;
            (inner.draft.clone(), inner.mode)
        };

        let outcome = match mode {
            FormMode::Create => self
                .api
                .create(draft, Utc::now())
                .await
                .map(|_| "New quiz created successfully!"),
            FormMode::Edit(id) => self
                .api
                .update(id, draft)
                .await
                .map(|_| "Quiz updated successfully!"),
        };

        self.inner.lock().await.is_loading = false;

        match outcome {
            Ok(message) => {
                self.notifier.notify(NoticeKind::Success, message);
                Some(NavIntent::ToDashboard)
            }
            Err(err) => {
                warn!(error = %err, "quiz save failed");
                self.notifier
                    .notify(NoticeKind::Error, "Something went wrong. Please try again.");
                None
            }
        }
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.inner.lock().await.draft.title = title.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.inner.lock().await.draft.description = description.into();
    }

    pub async fn draft(&self) -> QuizDraft {
        self.inner.lock().await.draft.clone()
    }

    pub async fn mode(&self) -> FormMode {
        self.inner.lock().await.mode
    }

    pub async fn is_editing(&self) -> bool {
        matches!(self.inner.lock().await.mode, FormMode::Edit(_))
    }

    pub async fn validation_errors(&self) -> BTreeMap<String, String> {
        self.inner.lock().await.validation_errors.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.is_loading
    }
}
