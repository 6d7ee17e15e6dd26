//! Response normalization.
//!
//! Backends in the wild spell the same field several ways. Each response type
//! has exactly one coalescing function here; for every field the first key in
//! the listed order that is present, non-null and of a usable type wins.

use serde_json::Value;
use trivia_core::model::{ActiveQuestion, QuestionId};

use crate::error::ApiError;

const ID_KEYS: &[&str] = &["id", "question_id", "questionId"];
const PROMPT_KEYS: &[&str] = &["prompt", "question", "text"];
const CHOICE_KEYS: &[&str] = &["choices", "options"];

/// Normalized `GET /game/question` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPayload {
    pub question: ActiveQuestion,
    /// `question_number` → `questionNumber`
    pub number: Option<u32>,
    /// `total_questions` → `totalQuestions`
    pub total: Option<u32>,
}

/// Normalized `POST /game/answer` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerPayload {
    /// `correct` → `is_correct`, default `false`
    pub correct: bool,
    /// `correctIndex` → `correct_index`
    pub correct_index: Option<usize>,
    /// `explanation`
    pub explanation: Option<String>,
    /// `score`
    pub score: Option<u32>,
    /// `questionNumber` → `question_number`
    pub number: Option<u32>,
    /// `totalQuestions` → `total_questions`
    pub total: Option<u32>,
    /// `gameOver` → `game_over`, default `false`
    pub game_over: bool,
}

/// A question record as listed by the admin endpoints. Every field is
/// optional because the list is shown even when records are partial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRecord {
    /// `id` → `question_id` → `questionId`
    pub id: Option<QuestionId>,
    /// `prompt` → `question` → `text`
    pub prompt: String,
    /// `choices` → `options`
    pub choices: Vec<String>,
    /// `correct_index` → `correctIndex`
    pub correct_index: Option<usize>,
    /// `explanation`
    pub explanation: Option<String>,
}

/// Normalize a current-question response.
///
/// # Errors
///
/// Returns `ApiError::Decode` when no id can be resolved, since an answer
/// cannot be submitted without one.
pub fn normalize_question(value: &Value) -> Result<QuestionPayload, ApiError> {
    let id = coalesce(value, ID_KEYS, as_id)
        .ok_or_else(|| ApiError::Decode("question response has no id".into()))?;
    let question = ActiveQuestion {
        id,
        prompt: coalesce(value, PROMPT_KEYS, as_text).unwrap_or_default(),
        choices: coalesce(value, CHOICE_KEYS, as_choices).unwrap_or_default(),
    };
    Ok(QuestionPayload {
        question,
        number: coalesce(value, &["question_number", "questionNumber"], as_u32),
        total: coalesce(value, &["total_questions", "totalQuestions"], as_u32),
    })
}

/// Normalize a submit-answer response. Never fails: missing flags read as false.
#[must_use]
pub fn normalize_answer(value: &Value) -> AnswerPayload {
    AnswerPayload {
        correct: coalesce(value, &["correct", "is_correct"], as_bool).unwrap_or(false),
        correct_index: coalesce(value, &["correctIndex", "correct_index"], as_index),
        explanation: coalesce(value, &["explanation"], as_text),
        score: coalesce(value, &["score"], as_u32),
        number: coalesce(value, &["questionNumber", "question_number"], as_u32),
        total: coalesce(value, &["totalQuestions", "total_questions"], as_u32),
        game_over: coalesce(value, &["gameOver", "game_over"], as_bool).unwrap_or(false),
    }
}

/// Normalize an admin list response: a bare array, or an object wrapping the
/// array under `items` → `questions`. Anything else is an empty list.
#[must_use]
pub fn normalize_question_list(value: &Value) -> Vec<QuestionRecord> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(_) => coalesce(value, &["items", "questions"], Value::as_array),
        _ => None,
    };
    items
        .map(|items| items.iter().map(normalize_question_record).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn normalize_question_record(value: &Value) -> QuestionRecord {
    QuestionRecord {
        id: coalesce(value, ID_KEYS, as_id),
        prompt: coalesce(value, PROMPT_KEYS, as_text).unwrap_or_default(),
        choices: coalesce(value, CHOICE_KEYS, as_choices).unwrap_or_default(),
        correct_index: coalesce(value, &["correct_index", "correctIndex"], as_index),
        explanation: coalesce(value, &["explanation"], as_text),
    }
}

fn coalesce<'a, T>(
    value: &'a Value,
    keys: &[&str],
    convert: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter(|field| !field.is_null())
        .find_map(convert)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Blank ids count as missing.
fn as_id(value: &Value) -> Option<QuestionId> {
    as_text(value)?.parse().ok()
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    as_u64(value).and_then(|n| u32::try_from(n).ok())
}

fn as_index(value: &Value) -> Option<usize> {
    as_u64(value).and_then(|n| usize::try_from(n).ok())
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Unreadable entries become empty strings so indices still line up with
/// the backend's list.
fn as_choices(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| as_text(item).unwrap_or_default())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_prefers_snake_case_id_order() {
        let payload = normalize_question(&json!({
            "questionId": "camel",
            "question_id": "snake",
            "prompt": "Largest planet?",
            "choices": ["Mars", "Jupiter"],
        }))
        .unwrap();
        assert_eq!(payload.question.id, QuestionId::new("snake"));
    }

    #[test]
    fn question_accepts_alternate_spellings() {
        let payload = normalize_question(&json!({
            "questionId": 7,
            "text": "Largest planet?",
            "options": ["Mars", "Jupiter"],
            "totalQuestions": 5,
            "questionNumber": 2,
        }))
        .unwrap();
        assert_eq!(payload.question.id, QuestionId::new("7"));
        assert_eq!(payload.question.prompt, "Largest planet?");
        assert_eq!(payload.question.choices, vec!["Mars", "Jupiter"]);
        assert_eq!(payload.total, Some(5));
        assert_eq!(payload.number, Some(2));
    }

    #[test]
    fn null_fields_fall_through_to_next_key() {
        let payload = normalize_question(&json!({
            "id": null,
            "question_id": "q2",
            "prompt": null,
            "question": "Boiling point of water?",
            "choices": ["90", "100"],
        }))
        .unwrap();
        assert_eq!(payload.question.id, QuestionId::new("q2"));
        assert_eq!(payload.question.prompt, "Boiling point of water?");
    }

    #[test]
    fn question_without_id_is_rejected() {
        let err = normalize_question(&json!({ "prompt": "?" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn blank_id_falls_through_to_next_key() {
        let payload = normalize_question(&json!({
            "id": "  ",
            "questionId": " q9 ",
            "prompt": "?",
        }))
        .unwrap();
        assert_eq!(payload.question.id, QuestionId::new("q9"));
    }

    #[test]
    fn unreadable_choices_keep_their_position() {
        let payload = normalize_question(&json!({
            "id": "q3",
            "prompt": "Pick one",
            "choices": ["A", null, { "label": "B" }, "C"],
        }))
        .unwrap();
        assert_eq!(payload.question.choices, vec!["A", "", "", "C"]);
    }

    #[test]
    fn answer_precedence_prefers_camel_case_progress() {
        let payload = normalize_answer(&json!({
            "is_correct": true,
            "correct_index": 2,
            "score": 1,
            "questionNumber": 2,
            "question_number": 9,
            "total_questions": 3,
            "game_over": false,
        }));
        assert!(payload.correct);
        assert_eq!(payload.correct_index, Some(2));
        assert_eq!(payload.score, Some(1));
        assert_eq!(payload.number, Some(2));
        assert_eq!(payload.total, Some(3));
        assert!(!payload.game_over);
    }

    #[test]
    fn answer_defaults_when_empty() {
        assert_eq!(normalize_answer(&Value::Null), AnswerPayload::default());
    }

    #[test]
    fn list_accepts_bare_and_wrapped_arrays() {
        let bare = json!([{ "id": 1, "prompt": "a" }]);
        let items = json!({ "items": [{ "id": 1, "prompt": "a" }] });
        let questions = json!({ "questions": [{ "id": 1, "prompt": "a" }] });
        for value in [bare, items, questions] {
            let list = normalize_question_list(&value);
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].id, Some(QuestionId::new("1")));
        }
        assert!(normalize_question_list(&json!({ "total": 0 })).is_empty());
        assert!(normalize_question_list(&Value::Null).is_empty());
    }

    #[test]
    fn record_without_id_keeps_other_fields() {
        let record = normalize_question_record(&json!({
            "question": "Orphan?",
            "options": ["x", "y"],
            "correctIndex": 1,
        }));
        assert_eq!(record.id, None);
        assert_eq!(record.prompt, "Orphan?");
        assert_eq!(record.correct_index, Some(1));
    }
}
