use std::sync::Arc;

use log::{debug, info, warn};
use rand::Rng;

use drill_core::model::{CompletionDraft, ProblemBatch, QuizSettings};
use drill_core::quiz::{QuizEvent, QuizSession};
use storage::repository::CompletionRepository;

use super::turn::QuizTurn;
use super::view::{CompletionListItem, CompletionReceipt};
use crate::Clock;
use crate::error::{SessionError, SubmissionError};
use crate::generator::ProblemGenerator;

/// Orchestrates quiz rounds: problem generation, event handling and
/// forwarding finished rounds to the completion sink.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    completions: Arc<dyn CompletionRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        completions: Arc<dyn CompletionRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            completions,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Start a new round with a freshly generated batch.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if the configured policy cannot produce problems.
    pub fn start_session(&self) -> Result<QuizSession, SessionError> {
        self.start_session_with_rng(&mut rand::rng())
    }

    /// Same as `start_session`, drawing from the given RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if the configured policy cannot produce problems.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let batch = self.generate_batch(rng)?;
        info!(
            "starting quiz round with {} problems ({:?})",
            batch.len(),
            self.settings.input_mode()
        );
        Ok(QuizSession::new(batch, self.settings.input_mode()))
    }

    /// Apply one user event and return the feedback with the resulting snapshot.
    ///
    /// Rejected events leave the session unchanged.
    pub fn handle_event(&self, session: &mut QuizSession, event: QuizEvent) -> QuizTurn {
        let phase = session.phase();
        let feedback = session.handle_event(event);
        match &feedback {
            Ok(accepted) => debug!("{phase:?} -> {:?}: {accepted:?}", session.phase()),
            Err(rejected) => debug!("{phase:?}: rejected ({rejected})"),
        }
        QuizTurn {
            feedback,
            snapshot: session.snapshot(),
        }
    }

    /// Replace the session's batch with a new one and reset progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if no new batch can be generated; the
    /// session is left untouched in that case.
    pub fn restart(&self, session: &mut QuizSession) -> Result<QuizTurn, SessionError> {
        self.restart_with_rng(session, &mut rand::rng())
    }

    /// Same as `restart`, drawing from the given RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if no new batch can be generated.
    pub fn restart_with_rng<R: Rng + ?Sized>(
        &self,
        session: &mut QuizSession,
        rng: &mut R,
    ) -> Result<QuizTurn, SessionError> {
        let batch = self.generate_batch(rng)?;
        info!("restarting quiz round (previous score {})", session.score());
        Ok(self.handle_event(session, QuizEvent::Restart(batch)))
    }

    /// Forward a finished round to the completion sink.
    ///
    /// The session is only read; sink failures are returned for the caller to
    /// show as a warning.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::NotComplete` before the last problem is done,
    /// `SubmissionError::Invalid` for blank names and `SubmissionError::Sink`
    /// if the record could not be stored.
    pub async fn submit_completion(
        &self,
        session: &QuizSession,
        participant: &str,
        team: &str,
    ) -> Result<CompletionReceipt, SubmissionError> {
        if !session.is_complete() {
            return Err(SubmissionError::NotComplete);
        }

        let record = CompletionDraft {
            participant: participant.to_string(),
            team: team.to_string(),
            score: session.score(),
            total: session.total(),
        }
        .validate(self.clock.now())?;

        match self.completions.append_completion(&record).await {
            Ok(id) => {
                info!(
                    "stored completion {id} for {} ({}): {}/{}",
                    record.participant(),
                    record.team(),
                    record.score(),
                    record.total()
                );
                Ok(CompletionReceipt { id, record })
            }
            Err(err) => {
                warn!("completion sink failed: {err}");
                Err(SubmissionError::Sink(err))
            }
        }
    }

    /// Most recent completions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Sink` on repository failures.
    pub async fn recent_completions(
        &self,
        limit: u32,
    ) -> Result<Vec<CompletionListItem>, SubmissionError> {
        let rows = self.completions.list_recent(limit).await?;
        Ok(rows.iter().map(CompletionListItem::from_row).collect())
    }

    fn generate_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ProblemBatch, SessionError> {
        let mut generator = ProblemGenerator::new(self.settings.generator().clone(), rng)?;
        Ok(generator.generate_batch(self.settings.batch_size())?)
    }
}
