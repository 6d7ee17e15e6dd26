//! Typed API surface: one HTTP call per operation, fixed path/method/body.

pub mod normalize;

use serde_json::{Value, json};
use trivia_core::model::{NewQuestion, QuestionId};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{AbortSignal, HttpClient, RequestOptions};

pub use normalize::{
    AnswerPayload, QuestionPayload, QuestionRecord, normalize_answer, normalize_question,
    normalize_question_list, normalize_question_record,
};

#[derive(Clone, Debug)]
pub struct TriviaApi {
    http: HttpClient,
}

impl TriviaApi {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn from_config(config: ApiConfig) -> Self {
        Self::new(HttpClient::new(config))
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        self.http.config()
    }

    /// `GET /`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn health(&self, signal: AbortSignal) -> Result<Value, ApiError> {
        self.http
            .request("/", RequestOptions::get().with_signal(signal))
            .await
    }

    /// `POST /game/start`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn start_game(
        &self,
        player_name: &str,
        signal: AbortSignal,
    ) -> Result<Value, ApiError> {
        let body = json!({ "player_name": player_name });
        self.http
            .request("/game/start", RequestOptions::post(body).with_signal(signal))
            .await
    }

    /// `GET /game/question`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn current_question(&self, signal: AbortSignal) -> Result<Value, ApiError> {
        self.http
            .request("/game/question", RequestOptions::get().with_signal(signal))
            .await
    }

    /// `POST /game/answer`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn submit_answer(
        &self,
        question_id: &QuestionId,
        selected_index: usize,
        signal: AbortSignal,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "question_id": question_id,
            "selected_index": selected_index,
        });
        self.http
            .request("/game/answer", RequestOptions::post(body).with_signal(signal))
            .await
    }

    /// `GET /admin/questions`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn list_questions(&self) -> Result<Value, ApiError> {
        self.http
            .request("/admin/questions", RequestOptions::get())
            .await
    }

    /// `POST /admin/questions`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn create_question(&self, question: &NewQuestion) -> Result<Value, ApiError> {
        self.http
            .request("/admin/questions", RequestOptions::post(question_body(question)))
            .await
    }

    /// `PUT /admin/questions/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn update_question(
        &self,
        id: &QuestionId,
        question: &NewQuestion,
    ) -> Result<Value, ApiError> {
        self.http
            .request(
                &question_path(id),
                RequestOptions::put(question_body(question)),
            )
            .await
    }

    /// `DELETE /admin/questions/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any request failure.
    pub async fn delete_question(&self, id: &QuestionId) -> Result<Value, ApiError> {
        self.http
            .request(&question_path(id), RequestOptions::delete())
            .await
    }
}

fn question_path(id: &QuestionId) -> String {
    format!("/admin/questions/{}", urlencoding::encode(id.as_str()))
}

fn question_body(question: &NewQuestion) -> Value {
    json!({
        "prompt": question.prompt,
        "choices": question.choices,
        "correct_index": question.correct_index,
        "explanation": question.explanation,
    })
}
