mod history_vm;
mod quiz_vm;
mod time_fmt;

pub use history_vm::{CompletionCardVm, map_completion_cards};
pub use quiz_vm::{
    FeedbackTone, FeedbackVm, InputError, QuizIntent, QuizVm, feedback_for, format_step,
    parse_pair, parse_step_guess, start_quiz,
};
pub use time_fmt::format_datetime;
