use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use trivia_core::model::QuestionId;

use crate::api::{AnswerPayload, QuestionPayload, TriviaApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{AbortController, AbortSignal};
use crate::mock::MockProvider;
use crate::provider::{ProviderKind, QuizProvider, RemoteProvider};

struct InFlight {
    id: u64,
    controller: AbortController,
}

/// Chooses between the remote and mock providers and owns the cancellation
/// controller of the gameplay request currently in flight.
///
/// Mock mode is switched on the first time a remote call fails with an
/// endpoint-missing error and stays on for the lifetime of the service.
pub struct GameService {
    remote: Arc<dyn QuizProvider>,
    mock: Arc<MockProvider>,
    mock_mode: AtomicBool,
    next_request: AtomicU64,
    in_flight: Mutex<Option<InFlight>>,
}

impl GameService {
    #[must_use]
    pub fn new(remote: Arc<dyn QuizProvider>) -> Self {
        Self {
            remote,
            mock: Arc::new(MockProvider::new()),
            mock_mode: AtomicBool::new(false),
            next_request: AtomicU64::new(1),
            in_flight: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn from_config(config: ApiConfig) -> Self {
        Self::new(Arc::new(RemoteProvider::new(TriviaApi::from_config(config))))
    }

    /// A service that never talks to the backend.
    #[must_use]
    pub fn offline(remote: Arc<dyn QuizProvider>) -> Self {
        let service = Self::new(remote);
        service.mock_mode.store(true, Ordering::Release);
        service
    }

    #[must_use]
    pub fn is_mock_mode(&self) -> bool {
        self.mock_mode.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        if self.is_mock_mode() {
            ProviderKind::Mock
        } else {
            self.remote.kind()
        }
    }

    /// Abort the in-flight gameplay request, if any.
    pub fn cancel_in_flight(&self) {
        if let Some(in_flight) = self.slot().take() {
            tracing::debug!(request = in_flight.id, "aborting in-flight request");
            in_flight.controller.abort();
        }
    }

    /// Start a session and load its first question, as one operation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` unless the failure was an endpoint-missing error
    /// that the mock provider recovered from.
    pub async fn start_session(&self, player_name: &str) -> Result<QuestionPayload, ApiError> {
        self.run(|provider, signal| async move {
            provider.start(player_name, signal.clone()).await?;
            provider.question(1, signal).await
        })
        .await
    }

    /// Load the question at 1-based position `number`.
    ///
    /// # Errors
    ///
    /// See [`GameService::start_session`].
    pub async fn fetch_question(&self, number: u32) -> Result<QuestionPayload, ApiError> {
        self.run(|provider, signal| async move { provider.question(number, signal).await })
            .await
    }

    /// Submit `selected_index` as the answer to `question_id`.
    ///
    /// # Errors
    ///
    /// See [`GameService::start_session`].
    pub async fn submit_answer(
        &self,
        question_id: &QuestionId,
        selected_index: usize,
    ) -> Result<AnswerPayload, ApiError> {
        self.run(|provider, signal| async move {
            provider.submit(question_id, selected_index, signal).await
        })
        .await
    }

    async fn run<T, F, Fut>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Fn(Arc<dyn QuizProvider>, AbortSignal) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let (request, signal) = self.begin_request();
        let result = self.with_fallback(&operation, signal).await;
        self.finish_request(request);
        result
    }

    async fn with_fallback<T, F, Fut>(
        &self,
        operation: &F,
        signal: AbortSignal,
    ) -> Result<T, ApiError>
    where
        F: Fn(Arc<dyn QuizProvider>, AbortSignal) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if !self.is_mock_mode() {
            match operation(Arc::clone(&self.remote), signal.clone()).await {
                Err(err) if err.is_endpoint_missing() => self.activate_mock(&err),
                other => return other,
            }
        }
        let mock: Arc<dyn QuizProvider> = self.mock.clone();
        operation(mock, signal).await
    }

    fn activate_mock(&self, cause: &ApiError) {
        if !self.mock_mode.swap(true, Ordering::AcqRel) {
            tracing::warn!(error = %cause, "backend endpoint unavailable, switching to mock data");
        }
    }

    fn begin_request(&self) -> (u64, AbortSignal) {
        let id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let controller = AbortController::new();
        let signal = controller.signal();
        if let Some(previous) = self.slot().replace(InFlight { id, controller }) {
            tracing::debug!(request = previous.id, "aborting leftover request");
            previous.controller.abort();
        }
        (id, signal)
    }

    fn finish_request(&self, id: u64) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|in_flight| in_flight.id == id) {
            slot.take();
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
