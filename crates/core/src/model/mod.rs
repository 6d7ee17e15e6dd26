mod ids;
mod question;
mod session;

pub use ids::QuestionId;
pub use question::{NewQuestion, Question, QuestionDraft, QuestionError, parse_choice_lines};
pub use session::{ActiveQuestion, AnswerResult, GamePhase, Progress};
