use services::{AdminService, ApiError, QuestionRecord, Saved};
use trivia_core::model::{QuestionDraft, QuestionId};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminIntent {
    Submit,
    Edit(usize),
    CancelEdit,
    Delete(usize),
}

/// Raw form fields; choices are entered one per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminForm {
    pub prompt: String,
    pub choices_text: String,
    pub correct_index: String,
    pub explanation: String,
}

impl AdminForm {
    #[must_use]
    pub fn from_record(record: &QuestionRecord) -> Self {
        Self {
            prompt: record.prompt.clone(),
            choices_text: record.choices.join("\n"),
            correct_index: record
                .correct_index
                .map(|index| index.to_string())
                .unwrap_or_default(),
            explanation: record.explanation.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn draft(&self) -> QuestionDraft {
        QuestionDraft::from_form(
            self.prompt.as_str(),
            &self.choices_text,
            self.correct_index.as_str(),
            self.explanation.as_str(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRowVm {
    pub index: usize,
    pub prompt: String,
    pub choice_count: String,
    pub answer: Option<String>,
    pub has_id: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminVm {
    records: Vec<QuestionRecord>,
    form: AdminForm,
    editing: Option<QuestionId>,
    error: Option<String>,
}

impl AdminVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn set_records(&mut self, records: Vec<QuestionRecord>) {
        self.records = records;
    }

    #[must_use]
    pub fn form(&self) -> &AdminForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AdminForm {
        &mut self.form
    }

    #[must_use]
    pub fn editing(&self) -> Option<&QuestionId> {
        self.editing.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Save changes"
        } else {
            "Add question"
        }
    }

    #[must_use]
    pub fn rows(&self) -> Vec<QuestionRowVm> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| QuestionRowVm {
                index,
                prompt: if record.prompt.trim().is_empty() {
                    "(no prompt)".to_string()
                } else {
                    record.prompt.clone()
                },
                choice_count: match record.choices.len() {
                    1 => "1 choice".to_string(),
                    count => format!("{count} choices"),
                },
                answer: record
                    .correct_index
                    .and_then(|correct| record.choices.get(correct))
                    .cloned(),
                has_id: record.id.is_some(),
            })
            .collect()
    }

    /// Load a listed record into the form. Records without an id are
    /// copied into a fresh create form instead.
    pub fn edit(&mut self, index: usize) {
        let Some(record) = self.records.get(index) else {
            return;
        };
        self.form = AdminForm::from_record(record);
        self.editing = record.id.clone();
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.form = AdminForm::default();
        self.editing = None;
        self.error = None;
    }

    /// # Errors
    ///
    /// Returns the load failure; it is also kept in `error()`.
    pub async fn reload(&mut self, admin: &AdminService) -> Result<(), ViewError> {
        match admin.list_questions().await {
            Ok(records) => {
                self.records = records;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Create, or update the record being edited. The form is cleared once
    /// the backend accepts the change, even if the reload afterwards fails.
    ///
    /// # Errors
    ///
    /// Returns validation, request and reload failures; they are also kept
    /// in `error()`.
    pub async fn submit(&mut self, admin: &AdminService) -> Result<(), ViewError> {
        let draft = self.form.draft();
        let outcome = match &self.editing {
            Some(id) => admin.update_question(id, &draft).await,
            None => admin.create_question(&draft).await,
        };
        match outcome {
            Ok(saved) => {
                self.cancel_edit();
                self.apply(saved)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// # Errors
    ///
    /// Returns the request failure; it is also kept in `error()`.
    pub async fn delete(&mut self, admin: &AdminService, index: usize) -> Result<(), ViewError> {
        let Some(record) = self.records.get(index).cloned() else {
            return Ok(());
        };
        match admin.delete_question(&record).await {
            Ok(Some(saved)) => {
                if record.id.is_some() && self.editing == record.id {
                    self.cancel_edit();
                }
                self.apply(saved)
            }
            Ok(None) => Ok(()),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    fn apply(&mut self, saved: Saved) -> Result<(), ViewError> {
        match saved.refreshed {
            Ok(records) => {
                self.records = records;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(reload_failed(&err))),
        }
    }

    fn fail(&mut self, err: ViewError) -> ViewError {
        self.error = Some(err.message().to_string());
        err
    }
}

fn reload_failed(err: &ApiError) -> ViewError {
    ViewError::Message(format!("Saved, but the list could not be reloaded: {err}"))
}
