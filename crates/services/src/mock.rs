//! Fixed in-memory question set used when the backend endpoints are missing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use trivia_core::model::{ActiveQuestion, NewQuestion, Question, QuestionId};

use crate::api::{AnswerPayload, QuestionPayload};
use crate::error::ApiError;
use crate::http::AbortSignal;
use crate::provider::{ProviderKind, QuizProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MockState {
    score: u32,
    /// Position of the question most recently served, 1-based.
    position: u32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            score: 0,
            position: 1,
        }
    }
}

#[derive(Debug)]
pub struct MockProvider {
    questions: Vec<Question>,
    state: Mutex<MockState>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: mock_questions(),
            state: Mutex::new(MockState::default()),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.lock().score
    }

    /// Reset score and position to the first question.
    pub fn reset(&self) {
        *self.lock() = MockState::default();
    }

    /// Serve the question at `number`, clamped into `[1, total]`.
    #[must_use]
    pub fn question_at(&self, number: u32) -> QuestionPayload {
        let total = self.total();
        let position = number.clamp(1, total.max(1));
        self.lock().position = position;

        let question = &self.questions[(position - 1) as usize];
        QuestionPayload {
            question: ActiveQuestion {
                id: question.id().clone(),
                prompt: question.prompt().to_owned(),
                choices: question.choices().to_vec(),
            },
            number: Some(position),
            total: Some(total),
        }
    }

    /// Grade an answer. Game over is decided by the position served before
    /// this submission, not by anything the caller increments afterwards.
    #[must_use]
    pub fn grade(&self, question_id: &QuestionId, selected_index: usize) -> AnswerPayload {
        let question = self
            .questions
            .iter()
            .find(|question| question.id() == question_id)
            .unwrap_or_else(|| {
                tracing::warn!(
                    %question_id,
                    "unknown mock question id, grading against the first question"
                );
                &self.questions[0]
            });
        let correct = question.is_correct(selected_index);
        let total = self.total();

        let mut state = self.lock();
        if correct {
            state.score = state.score.saturating_add(1);
        }
        AnswerPayload {
            correct,
            correct_index: Some(question.correct_index()),
            explanation: question.explanation().map(str::to_owned),
            score: Some(state.score),
            number: Some(state.position),
            total: Some(total),
            game_over: state.position == total,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QuizProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    async fn start(&self, player_name: &str, _signal: AbortSignal) -> Result<(), ApiError> {
        tracing::debug!(player_name, "starting mock session");
        self.reset();
        Ok(())
    }

    async fn question(
        &self,
        number: u32,
        _signal: AbortSignal,
    ) -> Result<QuestionPayload, ApiError> {
        Ok(self.question_at(number))
    }

    async fn submit(
        &self,
        question_id: &QuestionId,
        selected_index: usize,
        _signal: AbortSignal,
    ) -> Result<AnswerPayload, ApiError> {
        Ok(self.grade(question_id, selected_index))
    }
}

fn mock_questions() -> Vec<Question> {
    let entries: [(&str, &str, [&str; 4], usize, &str); 3] = [
        (
            "mock-1",
            "What is the capital of France?",
            ["Berlin", "Madrid", "Paris", "Rome"],
            2,
            "Paris is the capital and largest city of France.",
        ),
        (
            "mock-2",
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            "Iron oxide on its surface gives Mars its reddish color.",
        ),
        (
            "mock-3",
            "How many continents are there?",
            ["Five", "Six", "Seven", "Eight"],
            2,
            "Africa, Antarctica, Asia, Australia, Europe, North America and South America.",
        ),
    ];

    entries
        .into_iter()
        .map(|(id, prompt, choices, correct_index, explanation)| {
            NewQuestion {
                prompt: prompt.to_owned(),
                choices: choices.iter().map(|choice| (*choice).to_owned()).collect(),
                correct_index,
                explanation: Some(explanation.to_owned()),
            }
            .assign_id(QuestionId::new(id))
        })
        .collect()
}
