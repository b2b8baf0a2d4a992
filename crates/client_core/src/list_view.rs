//! View state behind the quiz dashboard: the fetched collection, a local
//! free-text filter, and the fetch/delete operations against the API.

use std::sync::Arc;

use shared::{domain::QuizId, protocol::QuizSummary};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{NoticeKind, Notifier, QuizApi};

#[derive(Default)]
struct ListViewState {
    items: Vec<QuizSummary>,
    filter_text: String,
    is_loading: bool,
}

pub struct ListViewController {
    api: Arc<dyn QuizApi>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<ListViewState>,
}

impl ListViewController {
    pub fn new(api: Arc<dyn QuizApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            inner: Mutex::new(ListViewState::default()),
        }
    }

    /// Replaces the whole collection from the server. A failed refresh
    /// leaves whatever is already loaded untouched; stale-but-present beats
    /// an emptied dashboard. Returns without a request while another
    /// operation is still in flight.
    pub async fn refresh(&self) {
        {
            let mut inner = self.inner.lock().await;
            if inner.is_loading {
                return;
            }
            inner.is_loading = true;
        }

        let result = self.api.list().await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(items) => {
                inner.items = items;
            }
            Err(err) => {
                warn!(error = %err, "quiz list refresh failed");
                self.notifier
                    .notify(NoticeKind::Error, "Failed to load quizzes.");
            }
        }
        inner.is_loading = false;
    }

    /// Confirmed delete: the local entry is removed only after the server
    /// acknowledges, so the view never shows a deletion the server
    /// rejected. Returns without a request while another operation is
    /// still in flight.
    pub async fn remove(&self, id: QuizId) {
        {
            let mut inner = self.inner.lock().await;
            if inner.is_loading {
                return;
            }
            inner.is_loading = true;
        }

        let result = self.api.delete(id).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(()) => {
                inner.items.retain(|quiz| quiz.id != id);
                self.notifier
                    .notify(NoticeKind::Success, "Quiz deleted successfully!");
            }
            Err(err) => {
                warn!(error = %err, quiz_id = id.0, "quiz delete failed");
                self.notifier
                    .notify(NoticeKind::Error, "Failed to delete quiz.");
            }
        }
        inner.is_loading = false;
    }

    pub async fn set_filter(&self, text: impl Into<String>) {
        self.inner.lock().await.filter_text = text.into();
    }

    pub async fn filter_text(&self) -> String {
        self.inner.lock().await.filter_text.clone()
    }

    /// Case-insensitive title substring match over the current items. Pure
    /// projection of the current state; an empty filter yields the full
    /// sequence in server order.
    pub async fn filtered(&self) -> Vec<QuizSummary> {
        let inner = self.inner.lock().await;
        let needle = inner.filter_text.to_lowercase();
        inner
            .items
            .iter()
            .filter(|quiz| quiz.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub async fn items(&self) -> Vec<QuizSummary> {
        self.inner.lock().await.items.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.is_loading
    }
}
