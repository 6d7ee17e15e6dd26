use thiserror::Error;

use crate::model::ids::QuestionId;

/// Minimum number of choices a question needs to be playable.
pub const MIN_CHOICES: usize = 2;

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("Provide at least 2 choices")]
    TooFewChoices { provided: usize },

    #[error("Correct index must be a number")]
    InvalidIndex { raw: String },

    #[error("Correct index {index} is out of range for {count} choices")]
    IndexOutOfRange { index: usize, count: usize },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question input, as typed into the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: String,
    pub explanation: String,
}

impl QuestionDraft {
    /// Build a draft from raw form fields. `choices_text` holds one choice per line.
    #[must_use]
    pub fn from_form(
        prompt: impl Into<String>,
        choices_text: &str,
        correct_index: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            choices: parse_choice_lines(choices_text),
            correct_index: correct_index.into(),
            explanation: explanation.into(),
        }
    }

    /// Validate the draft.
    ///
    /// Checks run in a fixed order (prompt, choice count, index) so the first
    /// problem the user needs to fix is the one reported.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` encountered.
    pub fn validate(&self) -> Result<NewQuestion, QuestionError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let choices: Vec<String> = self
            .choices
            .iter()
            .map(|choice| choice.trim())
            .filter(|choice| !choice.is_empty())
            .map(str::to_owned)
            .collect();
        if choices.len() < MIN_CHOICES {
            return Err(QuestionError::TooFewChoices {
                provided: choices.len(),
            });
        }

        let raw_index = self.correct_index.trim();
        let index: usize = raw_index.parse().map_err(|_| QuestionError::InvalidIndex {
            raw: raw_index.to_owned(),
        })?;
        if index >= choices.len() {
            return Err(QuestionError::IndexOutOfRange {
                index,
                count: choices.len(),
            });
        }

        let explanation = self.explanation.trim();
        Ok(NewQuestion {
            prompt: prompt.to_owned(),
            choices,
            correct_index: index,
            explanation: (!explanation.is_empty()).then(|| explanation.to_owned()),
        })
    }
}

/// Split a textarea value into choices: one per line, blank lines dropped.
#[must_use]
pub fn parse_choice_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

//
// ─── VALIDATED QUESTION ────────────────────────────────────────────────────────
//

/// A validated question without an id; this is the admin create/update body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    pub explanation: Option<String>,
}

impl NewQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            prompt: self.prompt,
            choices: self.choices,
            correct_index: self.correct_index,
            explanation: self.explanation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, selected_index: usize) -> bool {
        selected_index == self.correct_index
    }
}
