mod admin_vm;
mod game_vm;

pub use admin_vm::{AdminForm, AdminIntent, AdminVm, QuestionRowVm};
pub use game_vm::{ChoiceState, ChoiceVm, FeedbackVm, GameIntent, GameVm};
