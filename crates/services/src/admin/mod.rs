//! Question administration: list, create, update and delete.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use trivia_core::model::{NewQuestion, QuestionDraft, QuestionId};

use crate::api::{QuestionRecord, TriviaApi, normalize_question_list};
use crate::error::{AdminError, ApiError};

/// Admin endpoints as seen by the admin service.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the list cannot be fetched.
    async fn list(&self) -> Result<Vec<QuestionRecord>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the question cannot be created.
    async fn create(&self, question: &NewQuestion) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the question cannot be updated.
    async fn update(&self, id: &QuestionId, question: &NewQuestion) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the question cannot be deleted.
    async fn delete(&self, id: &QuestionId) -> Result<(), ApiError>;
}

#[async_trait]
impl AdminBackend for TriviaApi {
    async fn list(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        let body = self.list_questions().await?;
        Ok(normalize_question_list(&body))
    }

    async fn create(&self, question: &NewQuestion) -> Result<(), ApiError> {
        self.create_question(question).await?;
        Ok(())
    }

    async fn update(&self, id: &QuestionId, question: &NewQuestion) -> Result<(), ApiError> {
        self.update_question(id, question).await?;
        Ok(())
    }

    async fn delete(&self, id: &QuestionId) -> Result<(), ApiError> {
        self.delete_question(id).await?;
        Ok(())
    }
}

/// A mutation the backend accepted, followed by a reload of the list.
///
/// A failed reload does not undo the change; callers must treat the change
/// as saved either way.
#[derive(Debug)]
pub struct Saved {
    pub refreshed: Result<Vec<QuestionRecord>, ApiError>,
}

/// Serializes admin actions and refreshes the full list after every mutation.
pub struct AdminService {
    backend: Arc<dyn AdminBackend>,
    loading: AtomicBool,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AdminService {
    #[must_use]
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self {
            backend,
            loading: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Busy` while another admin action runs, or
    /// `AdminError::Api` if the request fails.
    pub async fn list_questions(&self) -> Result<Vec<QuestionRecord>, AdminError> {
        let _guard = self.begin()?;
        Ok(self.backend.list().await?)
    }

    /// Validate locally, create, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without making a request when the
    /// draft is invalid, `AdminError::Busy` while another action runs, or
    /// `AdminError::Api` if the create request fails. A failed reload is
    /// reported in [`Saved::refreshed`] instead.
    pub async fn create_question(&self, draft: &QuestionDraft) -> Result<Saved, AdminError> {
        let question = draft.validate()?;
        let _guard = self.begin()?;
        self.backend.create(&question).await?;
        tracing::info!(prompt = %question.prompt, "question created");
        Ok(self.refresh().await)
    }

    /// Validate locally, update, then reload the list.
    ///
    /// # Errors
    ///
    /// See [`AdminService::create_question`].
    pub async fn update_question(
        &self,
        id: &QuestionId,
        draft: &QuestionDraft,
    ) -> Result<Saved, AdminError> {
        let question = draft.validate()?;
        let _guard = self.begin()?;
        self.backend.update(id, &question).await?;
        tracing::info!(%id, "question updated");
        Ok(self.refresh().await)
    }

    /// Delete a listed record, then reload the list. Records without a
    /// resolvable id are left alone and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// See [`AdminService::create_question`].
    pub async fn delete_question(
        &self,
        record: &QuestionRecord,
    ) -> Result<Option<Saved>, AdminError> {
        let Some(id) = record.id.as_ref() else {
            tracing::debug!(prompt = %record.prompt, "delete skipped, record has no id");
            return Ok(None);
        };
        let _guard = self.begin()?;
        self.backend.delete(id).await?;
        tracing::info!(%id, "question deleted");
        Ok(Some(self.refresh().await))
    }

    async fn refresh(&self) -> Saved {
        let refreshed = self.backend.list().await;
        if let Err(err) = &refreshed {
            tracing::warn!(error = %err, "reload after change failed");
        }
        Saved { refreshed }
    }

    fn begin(&self) -> Result<LoadingGuard<'_>, AdminError> {
        if self.loading.swap(true, Ordering::AcqRel) {
            return Err(AdminError::Busy);
        }
        Ok(LoadingGuard(&self.loading))
    }
}
