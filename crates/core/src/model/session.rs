use crate::model::QuestionId;

/// Where a play-through currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GamePhase {
    /// Not started, or restarted.
    #[default]
    Idle,
    /// Start requested; the first question has not arrived yet.
    AwaitingQuestion,
    /// A question is shown and no choice has been made.
    Playing,
    /// A choice was made and its feedback is shown.
    Answered,
    /// The final answer was flagged game over and the player advanced.
    Complete,
}

/// 1-based question number and total question count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub number: u32,
    pub total: u32,
}

impl Progress {
    #[must_use]
    pub const fn new(number: u32, total: u32) -> Self {
        Self { number, total }
    }
}

/// A question as presented to the player. The correct index is not known
/// until an answer is graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub id: QuestionId,
    pub prompt: String,
    pub choices: Vec<String>,
}

impl ActiveQuestion {
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    pub correct_index: Option<usize>,
    pub explanation: Option<String>,
    pub score: u32,
    pub progress: Progress,
    pub game_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_question_choice_lookup() {
        let question = ActiveQuestion {
            id: QuestionId::new("q1"),
            prompt: "?".into(),
            choices: vec!["a".into(), "b".into()],
        };
        assert_eq!(question.choice(1), Some("b"));
        assert_eq!(question.choice(2), None);
    }
}
