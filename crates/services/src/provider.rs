use async_trait::async_trait;
use trivia_core::model::QuestionId;

use crate::api::{
    AnswerPayload, QuestionPayload, TriviaApi, normalize_answer, normalize_question,
};
use crate::error::ApiError;
use crate::http::AbortSignal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Remote,
    Mock,
}

/// Gameplay capability shared by the real backend and the local mock.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Begin a session for `player_name`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session cannot be started.
    async fn start(&self, player_name: &str, signal: AbortSignal) -> Result<(), ApiError>;

    /// Fetch the question at 1-based position `number`. The remote backend
    /// tracks its own position and ignores `number`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the question cannot be fetched or decoded.
    async fn question(
        &self,
        number: u32,
        signal: AbortSignal,
    ) -> Result<QuestionPayload, ApiError>;

    /// Grade `selected_index` for `question_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the answer cannot be submitted.
    async fn submit(
        &self,
        question_id: &QuestionId,
        selected_index: usize,
        signal: AbortSignal,
    ) -> Result<AnswerPayload, ApiError>;
}

/// `QuizProvider` backed by the HTTP API.
#[derive(Clone, Debug)]
pub struct RemoteProvider {
    api: TriviaApi,
}

impl RemoteProvider {
    #[must_use]
    pub fn new(api: TriviaApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl QuizProvider for RemoteProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Remote
    }

    async fn start(&self, player_name: &str, signal: AbortSignal) -> Result<(), ApiError> {
        self.api.start_game(player_name, signal).await?;
        Ok(())
    }

    async fn question(
        &self,
        _number: u32,
        signal: AbortSignal,
    ) -> Result<QuestionPayload, ApiError> {
        let body = self.api.current_question(signal).await?;
        normalize_question(&body)
    }

    async fn submit(
        &self,
        question_id: &QuestionId,
        selected_index: usize,
        signal: AbortSignal,
    ) -> Result<AnswerPayload, ApiError> {
        let body = self
            .api
            .submit_answer(question_id, selected_index, signal)
            .await?;
        Ok(normalize_answer(&body))
    }
}
