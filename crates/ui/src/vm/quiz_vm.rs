use drill_core::model::StepGuess;
use drill_core::quiz::{QuizError, QuizEvent, QuizFeedback, QuizPhase, QuizSession, QuizSnapshot};
use services::{QuizLoopService, SessionError, SubmissionError};

use crate::views::ViewError;

/// User actions on the quiz page, carrying the raw text of the inputs.
///
/// `step` and `problem` are the indices the form was rendered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    ConfirmNumbers {
        step: usize,
        dividend: String,
        divisor: String,
    },
    SubmitStep {
        step: usize,
        quotient: String,
        remainder: String,
    },
    SubmitGcd {
        problem: usize,
        answer: String,
    },
    NextProblem,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackTone {
    Success,
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub tone: FeedbackTone,
    pub text: String,
}

impl FeedbackVm {
    fn success(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Error,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Warning,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.tone {
            FeedbackTone::Success => "feedback feedback--success",
            FeedbackTone::Error => "feedback feedback--error",
            FeedbackTone::Warning => "feedback feedback--warning",
        }
    }
}

/// A text field that could not be read as a whole number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputError {
    Dividend,
    Divisor,
    Quotient,
    Remainder,
}

impl InputError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Dividend => "Dividend must be a whole number.",
            Self::Divisor => "Divisor must be a whole number.",
            Self::Quotient => "Quotient must be a whole number.",
            Self::Remainder => "Remainder must be a whole number.",
        }
    }
}

fn parse_field(raw: &str, field: InputError) -> Result<u32, InputError> {
    raw.trim().parse().map_err(|_| field)
}

/// # Errors
///
/// Returns `InputError` naming the first field that is not a whole number.
pub fn parse_step_guess(quotient: &str, remainder: &str) -> Result<StepGuess, InputError> {
    Ok(StepGuess::new(
        parse_field(quotient, InputError::Quotient)?,
        parse_field(remainder, InputError::Remainder)?,
    ))
}

/// # Errors
///
/// Returns `InputError` naming the first field that is not a whole number.
pub fn parse_pair(dividend: &str, divisor: &str) -> Result<(u32, u32), InputError> {
    Ok((
        parse_field(dividend, InputError::Dividend)?,
        parse_field(divisor, InputError::Divisor)?,
    ))
}

/// Render `dividend / divisor = quotient R remainder`.
#[must_use]
pub fn format_step(dividend: u32, divisor: u32, quotient: u32, remainder: u32) -> String {
    format!("{dividend} / {divisor} = {quotient} R {remainder}")
}

#[must_use]
pub fn feedback_for(result: &Result<QuizFeedback, QuizError>) -> FeedbackVm {
    match result {
        Ok(QuizFeedback::NumbersConfirmed { dividend, divisor }) => {
            FeedbackVm::success(format!("Now divide {dividend} by {divisor}."))
        }
        Ok(QuizFeedback::StepAccepted { terminal: false, .. }) => FeedbackVm::success("Correct!"),
        Ok(QuizFeedback::StepAccepted { terminal: true, .. }) => {
            FeedbackVm::success("Correct! The remainder is 0.")
        }
        Ok(QuizFeedback::GcdAccepted { gcd, .. }) => {
            FeedbackVm::success(format!("Correct! The GCD is {gcd}."))
        }
        Ok(QuizFeedback::Advanced { problem }) => {
            FeedbackVm::success(format!("On to problem {}.", problem + 1))
        }
        Ok(QuizFeedback::Completed { score, total }) => {
            FeedbackVm::success(format!("All done! Your final score: {score} / {total}"))
        }
        Ok(QuizFeedback::Restarted) => FeedbackVm::success("New problems are ready."),
        Err(QuizError::InvalidStepGuess) => FeedbackVm::error("Incorrect quotient or remainder."),
        Err(QuizError::InvalidGcdGuess) => FeedbackVm::error("That's not correct. Try again."),
        Err(QuizError::InvalidInput { .. }) => FeedbackVm::error("Please enter a valid integer."),
        Err(QuizError::NumbersMismatch { dividend, divisor }) => FeedbackVm::error(format!(
            "Use the correct current numbers: {dividend} and {divisor}."
        )),
        Err(QuizError::StaleSubmission { .. }) => {
            FeedbackVm::warning("That answer was already checked.")
        }
        Err(_) => FeedbackVm::warning("That action is not available right now."),
    }
}

/// Display state for the quiz page.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    session: QuizSession,
    feedback: Option<FeedbackVm>,
    saved_completion: Option<i64>,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            feedback: None,
            saved_completion: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.session.snapshot()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&FeedbackVm> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn saved_completion(&self) -> Option<i64> {
        self.saved_completion
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "Problem {} of {}",
            snapshot.problem_number, snapshot.batch_size
        )
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {} / {}", self.session.score(), self.session.total())
    }

    #[must_use]
    pub fn prompt_label(&self) -> Option<String> {
        self.session.current_problem().map(|problem| {
            format!(
                "Find the GCD of {} and {} using Euclidean division.",
                problem.dividend(),
                problem.divisor()
            )
        })
    }

    #[must_use]
    pub fn step_label(&self) -> String {
        format!("Step {}", self.session.steps().len() + 1)
    }

    /// The division to perform next, e.g. `48 / 18 =`.
    #[must_use]
    pub fn division_label(&self) -> String {
        let (dividend, divisor) = self.session.current_pair();
        format!("{dividend} / {divisor} =")
    }

    #[must_use]
    pub fn step_rows(&self) -> Vec<String> {
        self.session
            .steps()
            .iter()
            .map(|step| format_step(step.dividend, step.divisor, step.quotient, step.remainder))
            .collect()
    }

    #[must_use]
    pub fn final_label(&self) -> String {
        format!("Final score: {} / {}", self.session.score(), self.session.total())
    }

    /// Apply a synchronous intent and record its feedback.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Generator` if a restart cannot draw new problems.
    pub fn apply(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<(), ViewError> {
        let event = match intent {
            QuizIntent::ConfirmNumbers {
                step,
                dividend,
                divisor,
            } => {
                match parse_pair(&dividend, &divisor) {
                    Ok((dividend, divisor)) => QuizEvent::ConfirmNumbers {
                        step,
                        dividend,
                        divisor,
                    },
                    Err(err) => {
                        self.feedback = Some(FeedbackVm::error(err.message()));
                        return Ok(());
                    }
                }
            }
            QuizIntent::SubmitStep {
                step,
                quotient,
                remainder,
            } => match parse_step_guess(&quotient, &remainder) {
                Ok(guess) => QuizEvent::SubmitStep { step, guess },
                Err(err) => {
                    self.feedback = Some(FeedbackVm::error(err.message()));
                    return Ok(());
                }
            },
            QuizIntent::SubmitGcd { problem, answer } => QuizEvent::SubmitGcd { problem, answer },
            QuizIntent::NextProblem => QuizEvent::NextProblem,
            QuizIntent::Restart => {
                let turn = quiz_loop
                    .restart(&mut self.session)
                    .map_err(|_| ViewError::Generator)?;
                self.saved_completion = None;
                self.feedback = Some(feedback_for(&turn.feedback));
                return Ok(());
            }
        };

        let turn = quiz_loop.handle_event(&mut self.session, event);
        self.feedback = Some(feedback_for(&turn.feedback));
        Ok(())
    }

    /// Forward the finished round; failures become a warning and leave the
    /// quiz as it was.
    pub async fn submit_completion(
        &mut self,
        quiz_loop: &QuizLoopService,
        participant: &str,
        team: &str,
    ) {
        match quiz_loop
            .submit_completion(&self.session, participant, team)
            .await
        {
            Ok(receipt) => {
                self.saved_completion = Some(receipt.id);
                self.feedback = Some(FeedbackVm::success("Score submitted!"));
            }
            Err(SubmissionError::Invalid(_)) => {
                self.feedback = Some(FeedbackVm::warning("Please enter your name and team name."));
            }
            Err(SubmissionError::NotComplete) => {
                self.feedback = Some(FeedbackVm::warning("Finish every problem first."));
            }
            Err(_) => {
                self.feedback = Some(FeedbackVm::warning(
                    "Could not save your score. Please try again.",
                ));
            }
        }
    }
}

/// # Errors
///
/// Returns `ViewError::Generator` when the configured generator cannot
/// produce problems.
pub fn start_quiz(quiz_loop: &QuizLoopService) -> Result<QuizVm, ViewError> {
    match quiz_loop.start_session() {
        Ok(session) => Ok(QuizVm::new(session)),
        Err(SessionError::Generator(_)) => Err(ViewError::Generator),
        Err(_) => Err(ViewError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{Problem, ProblemBatch, QuizSettings, StepInputMode};
    use drill_core::time::fixed_clock;
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    fn quiz_loop() -> QuizLoopService {
        QuizLoopService::new(
            fixed_clock(),
            QuizSettings::default(),
            Arc::new(InMemoryRepository::new()),
        )
    }

    fn vm_for(dividend: u32, divisor: u32) -> QuizVm {
        let batch = ProblemBatch::new(vec![Problem::new(dividend, divisor).unwrap()]).unwrap();
        QuizVm::new(QuizSession::new(batch, StepInputMode::Direct))
    }

    #[test]
    fn parses_trimmed_numbers() {
        assert_eq!(parse_step_guess(" 2 ", "12"), Ok(StepGuess::new(2, 12)));
        assert_eq!(parse_step_guess("two", "12"), Err(InputError::Quotient));
        assert_eq!(parse_step_guess("2", "-1"), Err(InputError::Remainder));
        assert_eq!(parse_pair("48", ""), Err(InputError::Divisor));
    }

    #[test]
    fn labels_follow_the_session() {
        let mut vm = vm_for(48, 18);
        assert_eq!(vm.progress_label(), "Problem 1 of 1");
        assert_eq!(vm.division_label(), "48 / 18 =");
        assert_eq!(vm.step_label(), "Step 1");

        vm.apply(
            &quiz_loop(),
            QuizIntent::SubmitStep {
                step: 0,
                quotient: "2".into(),
                remainder: "12".into(),
            },
        )
        .unwrap();
        assert_eq!(vm.step_rows(), vec!["48 / 18 = 2 R 12".to_string()]);
        assert_eq!(vm.division_label(), "18 / 12 =");
        assert_eq!(vm.feedback().unwrap().tone, FeedbackTone::Success);
    }

    #[test]
    fn unparseable_input_never_reaches_the_session() {
        let mut vm = vm_for(48, 18);
        let before = vm.session().clone();
        vm.apply(
            &quiz_loop(),
            QuizIntent::SubmitStep {
                step: 0,
                quotient: "x".into(),
                remainder: "12".into(),
            },
        )
        .unwrap();
        assert_eq!(vm.session(), &before);
        assert_eq!(
            vm.feedback().unwrap().text,
            InputError::Quotient.message()
        );
    }

    #[test]
    fn wrong_gcd_reports_error() {
        let mut vm = vm_for(48, 18);
        let svc = quiz_loop();
        for (step, (q, r)) in [("2", "12"), ("1", "6"), ("2", "0")].into_iter().enumerate() {
            vm.apply(
                &svc,
                QuizIntent::SubmitStep {
                    step,
                    quotient: q.into(),
                    remainder: r.into(),
                },
            )
            .unwrap();
        }
        let gcd = |answer: &str| QuizIntent::SubmitGcd {
            problem: 0,
            answer: answer.into(),
        };
        vm.apply(&svc, gcd("5")).unwrap();
        assert_eq!(vm.feedback().unwrap().tone, FeedbackTone::Error);

        vm.apply(&svc, gcd("6")).unwrap();
        assert_eq!(vm.feedback().unwrap().text, "Correct! The GCD is 6.");
        assert_eq!(vm.score_label(), "Score: 1 / 1");
    }

    #[test]
    fn repeated_step_form_is_reported_as_already_checked() {
        let mut vm = vm_for(48, 18);
        let svc = quiz_loop();
        let rendered = QuizIntent::SubmitStep {
            step: vm.snapshot().step_index(),
            quotient: "2".into(),
            remainder: "12".into(),
        };

        vm.apply(&svc, rendered.clone()).unwrap();
        assert_eq!(vm.feedback().unwrap().tone, FeedbackTone::Success);
        let after_first = vm.session().clone();

        vm.apply(&svc, rendered).unwrap();
        let feedback = vm.feedback().unwrap();
        assert_eq!(feedback.tone, FeedbackTone::Warning);
        assert_eq!(feedback.text, "That answer was already checked.");
        assert_eq!(vm.session().steps().len(), 1);
        assert_eq!(vm.session(), &after_first);
    }

    #[test]
    fn gcd_form_from_an_earlier_problem_is_stale() {
        let mut vm = vm_for(48, 18);
        let svc = quiz_loop();
        for (step, (q, r)) in [("2", "12"), ("1", "6"), ("2", "0")].into_iter().enumerate() {
            vm.apply(
                &svc,
                QuizIntent::SubmitStep {
                    step,
                    quotient: q.into(),
                    remainder: r.into(),
                },
            )
            .unwrap();
        }
        vm.apply(
            &svc,
            QuizIntent::SubmitGcd {
                problem: 3,
                answer: "6".into(),
            },
        )
        .unwrap();
        assert_eq!(vm.feedback().unwrap().tone, FeedbackTone::Warning);
        assert_eq!(vm.score_label(), "Score: 0 / 1");
    }

    #[test]
    fn mismatch_names_current_numbers() {
        let feedback = feedback_for(&Err(QuizError::NumbersMismatch {
            dividend: 48,
            divisor: 18,
        }));
        assert_eq!(
            feedback.text,
            "Use the correct current numbers: 48 and 18."
        );
        assert_eq!(feedback.class(), "feedback feedback--error");
    }
}
