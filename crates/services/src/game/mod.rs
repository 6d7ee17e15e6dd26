mod service;
mod session;

// Public API of the gameplay subsystem.
pub use crate::error::GameError;
pub use service::GameService;
pub use session::{GameSession, SelectOutcome};
