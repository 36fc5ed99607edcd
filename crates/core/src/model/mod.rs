mod completion;
mod problem;
mod settings;
mod step;

pub use completion::{
    CompletionDraft, CompletionRecord, CompletionValidationError, MAX_NAME_LEN,
};
pub use problem::{Problem, ProblemBatch, ProblemError};
pub use settings::{
    DEFAULT_BATCH_SIZE, GeneratorPolicy, MAX_BATCH_SIZE, PairMatch, QuizSettings, SettingsError,
    StepInputMode,
};
pub use step::{StepGuess, StepRecord};
