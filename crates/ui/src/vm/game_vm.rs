use services::{GameService, GameSession, SelectOutcome};
use trivia_core::model::GamePhase;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameIntent {
    Start,
    Select(usize),
    Advance,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceState {
    Open,
    /// Picked and waiting for the grade.
    Pending,
    Correct,
    Incorrect,
    Locked,
}

impl ChoiceState {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Open => "choice",
            Self::Pending => "choice choice--pending",
            Self::Correct => "choice choice--correct",
            Self::Incorrect => "choice choice--incorrect",
            Self::Locked => "choice choice--locked",
        }
    }

    #[must_use]
    pub const fn is_disabled(self) -> bool {
        !matches!(self, Self::Open)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: usize,
    pub label: String,
    pub state: ChoiceState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub headline: String,
    pub explanation: Option<String>,
}

/// Presentation wrapper over a [`GameSession`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameVm {
    session: GameSession,
}

impl GameVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// # Errors
    ///
    /// Returns a `ViewError` carrying the session's message.
    pub async fn start(&mut self, game: &GameService, player_name: &str) -> Result<(), ViewError> {
        self.session
            .start(game, player_name)
            .await
            .map_err(ViewError::from)
    }

    /// # Errors
    ///
    /// Returns a `ViewError` when the answer could not be submitted.
    pub async fn select(
        &mut self,
        game: &GameService,
        index: usize,
    ) -> Result<SelectOutcome, ViewError> {
        self.session
            .select(game, index)
            .await
            .map_err(ViewError::from)
    }

    /// # Errors
    ///
    /// Returns a `ViewError` when the next question could not be loaded.
    pub async fn advance(&mut self, game: &GameService) -> Result<(), ViewError> {
        self.session.advance(game).await.map_err(ViewError::from)
    }

    pub fn restart(&mut self, game: &GameService) {
        self.session.restart(game);
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        self.session.player_name()
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.session
            .question()
            .map(|question| question.prompt.as_str())
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.session.progress();
        if progress.total == 0 {
            format!("Question {}", progress.number)
        } else {
            format!("Question {} of {}", progress.number, progress.total)
        }
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.session.score())
    }

    #[must_use]
    pub fn final_score_label(&self) -> String {
        format!(
            "Final score: {} / {}",
            self.session.score(),
            self.session.progress().total
        )
    }

    #[must_use]
    pub fn advance_label(&self) -> &'static str {
        if self.session.is_game_over() {
            "See results"
        } else {
            "Next question"
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.session.error()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        let result = self.session.result()?;
        let headline = if result.correct {
            "Correct!".to_string()
        } else {
            let answer = result.correct_index.and_then(|index| {
                self.session
                    .question()
                    .and_then(|question| question.choice(index))
            });
            match answer {
                Some(text) => format!("Incorrect. The correct answer was: {text}"),
                None => "Incorrect.".to_string(),
            }
        };
        Some(FeedbackVm {
            correct: result.correct,
            headline,
            explanation: result
                .explanation
                .clone()
                .filter(|text| !text.trim().is_empty()),
        })
    }

    /// Choice buttons for the current question. `pending` is the index the
    /// player just clicked while its submission is still out.
    #[must_use]
    pub fn choices(&self, pending: Option<usize>) -> Vec<ChoiceVm> {
        let Some(question) = self.session.question() else {
            return Vec::new();
        };
        let result = self.session.result();
        let selected = self.session.selected().or(pending);
        let busy = self.session.is_busy() || pending.is_some();

        question
            .choices
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let state = match (result, selected) {
                    (Some(result), _) if result.correct_index == Some(index) => {
                        ChoiceState::Correct
                    }
                    (Some(result), Some(chosen)) if chosen == index => {
                        if result.correct {
                            ChoiceState::Correct
                        } else {
                            ChoiceState::Incorrect
                        }
                    }
                    (Some(_), _) => ChoiceState::Locked,
                    (None, Some(chosen)) if chosen == index => ChoiceState::Pending,
                    (None, Some(_)) => ChoiceState::Locked,
                    (None, None) if busy => ChoiceState::Locked,
                    (None, None) => ChoiceState::Open,
                };
                ChoiceVm {
                    index,
                    label: label.clone(),
                    state,
                }
            })
            .collect()
    }
}
