use trivia_core::model::{ActiveQuestion, AnswerResult, GamePhase, Progress};

use crate::error::GameError;
use crate::game::GameService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection was locked and graded.
    Answered,
    /// The selection was not accepted (already answered, busy, game over,
    /// no question shown, or an index outside the choices).
    Ignored,
}

/// Gameplay state for one play-through.
///
/// Every operation takes `&mut self`, so reactions to user input are applied
/// one at a time; `busy` additionally rejects input while a request is out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameSession {
    phase: GamePhase,
    player_name: String,
    question: Option<ActiveQuestion>,
    selected: Option<usize>,
    score: u32,
    progress: Progress,
    result: Option<AnswerResult>,
    error: Option<String>,
    busy: bool,
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn question(&self) -> Option<&ActiveQuestion> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn result(&self) -> Option<&AnswerResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.as_ref().is_some_and(|result| result.game_over)
    }

    /// `Idle → AwaitingQuestion → Playing`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingPlayerName` for a blank name,
    /// `GameError::Busy` / `GameError::InvalidPhase` when a session cannot be
    /// started now, and `GameError::Api` when the backend call fails; in that
    /// case the session is back in `Idle` with the message in `error()`.
    pub async fn start(
        &mut self,
        service: &GameService,
        player_name: &str,
    ) -> Result<(), GameError> {
        let name = player_name.trim();
        if name.is_empty() {
            self.error = Some(GameError::MissingPlayerName.to_string());
            return Err(GameError::MissingPlayerName);
        }
        if self.busy {
            return Err(GameError::Busy);
        }
        if self.phase != GamePhase::Idle {
            return Err(GameError::InvalidPhase);
        }

        name.clone_into(&mut self.player_name);
        self.phase = GamePhase::AwaitingQuestion;
        self.error = None;
        self.busy = true;
        let outcome = service.start_session(name).await;
        self.busy = false;

        match outcome {
            Ok(payload) => {
                self.score = 0;
                self.selected = None;
                self.result = None;
                self.progress = Progress::new(
                    payload.number.unwrap_or(1),
                    payload.total.unwrap_or(self.progress.total),
                );
                self.question = Some(payload.question);
                self.phase = GamePhase::Playing;
                tracing::info!(
                    player = %self.player_name,
                    total = self.progress.total,
                    "game started"
                );
                Ok(())
            }
            Err(err) => {
                self.phase = GamePhase::Idle;
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// `Playing → Answered`. The selection locks before the request is sent
    /// and is only released again if the submission fails.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Api` when the submission fails; the session stays
    /// in `Playing` with the selection cleared.
    pub async fn select(
        &mut self,
        service: &GameService,
        index: usize,
    ) -> Result<SelectOutcome, GameError> {
        if self.selected.is_some()
            || self.busy
            || self.phase != GamePhase::Playing
            || self.is_game_over()
        {
            return Ok(SelectOutcome::Ignored);
        }
        let Some(question_id) = self
            .question
            .as_ref()
            .filter(|question| index < question.choices.len())
            .map(|question| question.id.clone())
        else {
            return Ok(SelectOutcome::Ignored);
        };

        self.selected = Some(index);
        self.error = None;
        self.busy = true;
        let outcome = service.submit_answer(&question_id, index).await;
        self.busy = false;

        match outcome {
            Ok(payload) => {
                let progress = Progress::new(
                    payload.number.unwrap_or(self.progress.number),
                    payload.total.unwrap_or(self.progress.total),
                );
                let score = payload.score.unwrap_or(self.score);
                self.score = score;
                self.progress = progress;
                self.result = Some(AnswerResult {
                    correct: payload.correct,
                    correct_index: payload.correct_index,
                    explanation: payload.explanation,
                    score,
                    progress,
                    game_over: payload.game_over,
                });
                self.phase = GamePhase::Answered;
                Ok(SelectOutcome::Answered)
            }
            Err(err) => {
                self.selected = None;
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// `Answered → Playing` with the next question, or `Answered → Complete`
    /// when the last result was flagged game over (no request is made).
    ///
    /// # Errors
    ///
    /// Returns `GameError::Busy` / `GameError::InvalidPhase` outside
    /// `Answered`, and `GameError::Api` when the next question cannot be
    /// loaded; the session then stays in `Answered`.
    pub async fn advance(&mut self, service: &GameService) -> Result<(), GameError> {
        if self.busy {
            return Err(GameError::Busy);
        }
        if self.phase != GamePhase::Answered {
            return Err(GameError::InvalidPhase);
        }
        if self.is_game_over() {
            self.phase = GamePhase::Complete;
            tracing::info!(score = self.score, total = self.progress.total, "game complete");
            return Ok(());
        }

        let next = self.progress.number.saturating_add(1);
        self.error = None;
        self.busy = true;
        let outcome = service.fetch_question(next).await;
        self.busy = false;

        match outcome {
            Ok(payload) => {
                self.progress = Progress::new(
                    payload.number.unwrap_or(next),
                    payload.total.unwrap_or(self.progress.total),
                );
                self.question = Some(payload.question);
                self.selected = None;
                self.result = None;
                self.phase = GamePhase::Playing;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Any phase → `Idle`. Aborts the in-flight request and clears everything
    /// except the player name.
    pub fn restart(&mut self, service: &GameService) {
        service.cancel_in_flight();
        let player_name = std::mem::take(&mut self.player_name);
        *self = Self {
            player_name,
            ..Self::default()
        };
    }
}
