#![forbid(unsafe_code)]

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod http;
pub mod mock;
pub mod provider;

pub use admin::{AdminBackend, AdminService, Saved};
pub use api::{QuestionRecord, TriviaApi};
pub use config::ApiConfig;
pub use error::{AdminError, ApiError, GameError};
pub use game::{GameService, GameSession, SelectOutcome};
pub use http::{AbortController, AbortSignal, HttpClient, RequestOptions};
pub use mock::MockProvider;
pub use provider::{ProviderKind, QuizProvider, RemoteProvider};
