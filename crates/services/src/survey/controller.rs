use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use survey_core::model::{QuestionSet, SessionId, SessionState, Summary, SurveyError};
use tracing::{debug, info, warn};

use crate::error::{GENERATION_FAILED_MESSAGE, SubmitError};
use crate::generator::SummaryGenerator;
use super::snapshot::SurveySnapshot;

/// Result of a `submit` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The summary was generated; the session is complete.
    Completed(Summary),
    /// Another submission is still in flight; nothing was sent.
    AlreadySubmitting,
}

struct Inner {
    session: SessionState,
    notice: Option<String>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one survey session: per-step validation, navigation, submission and reset.
///
/// Every operation takes `&self` and runs under a per-session lock, so calls
/// are ordered with respect to each other. The lock is released while the
/// summary request is outstanding; a second `submit` during that window is a
/// no-op.
pub struct SurveyController {
    id: SessionId,
    questions: QuestionSet,
    generator: Arc<dyn SummaryGenerator>,
    inner: Mutex<Inner>,
}

impl SurveyController {
    #[must_use]
    pub fn new(questions: QuestionSet, generator: Arc<dyn SummaryGenerator>) -> Self {
        let session = SessionState::new(&questions);
        let id = SessionId::new();
        debug!(session = %id, steps = questions.len(), "survey session started");
        Self {
            id,
            questions,
            generator,
            inner: Mutex::new(Inner {
                session,
                notice: None,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    // Every mutation leaves the state valid, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the full session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().session.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SurveySnapshot {
        let inner = self.lock();
        SurveySnapshot::capture(&self.questions, &inner.session, inner.notice.as_deref())
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.lock().session.progress_percent()
    }

    /// Overwrite the answer on the current question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Completed` / `SurveyError::Submitting` when edits
    /// are not accepted.
    pub fn record_answer(&self, text: impl Into<String>) -> Result<(), SurveyError> {
        let mut inner = self.lock();
        inner.session.record_answer(text)?;
        inner.notice = None;
        Ok(())
    }

    /// Validate the current answer and move to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Required` when the current answer is blank; the
    /// inline message is then part of the snapshot.
    pub fn advance(&self) -> Result<usize, SurveyError> {
        let mut inner = self.lock();
        let from = inner.session.current_step();
        match inner.session.advance() {
            Ok(step) => {
                inner.notice = None;
                debug!(session = %self.id, from, to = step, "advanced");
                Ok(step)
            }
            Err(err) => {
                debug!(session = %self.id, step = from, error = %err, "advance rejected");
                Err(err)
            }
        }
    }

    /// Move back one question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Completed` / `SurveyError::Submitting` when
    /// navigation is not accepted.
    pub fn retreat(&self) -> Result<usize, SurveyError> {
        let mut inner = self.lock();
        let from = inner.session.current_step();
        let step = inner.session.retreat()?;
        inner.notice = None;
        debug!(session = %self.id, from, to = step, "retreated");
        Ok(step)
    }

    /// Submit every answer for summarization.
    ///
    /// Exactly one generator call is made per accepted submission. On failure the
    /// session stays on the last question with its answers, ready for another try.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Survey` when the survey cannot be submitted yet
    /// (e.g. `SurveyError::IncompleteForm`), and `SubmitError::Generation` when
    /// the summary request failed.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let payload = {
            let mut inner = self.lock();
            if inner.session.is_submitting() {
                debug!(session = %self.id, "submit ignored, request already in flight");
                return Ok(SubmitOutcome::AlreadySubmitting);
            }
            match inner.session.begin_submission(&self.questions) {
                Ok(payload) => {
                    inner.notice = None;
                    payload
                }
                Err(err) => {
                    if matches!(err, SurveyError::IncompleteForm { .. }) {
                        inner.notice = Some(err.to_string());
                    }
                    debug!(session = %self.id, error = %err, "submit rejected");
                    return Err(err.into());
                }
            }
        };

        info!(session = %self.id, answers = payload.pairs().len(), "submitting survey");
        let in_flight = InFlight {
            controller: self,
            armed: true,
        };
        let result = self.generator.generate(payload.pairs()).await;
        in_flight.disarm();

        let mut inner = self.lock();
        match result {
            Ok(summary) => {
                inner.session.complete_submission(summary.clone());
                info!(session = %self.id, "survey complete");
                Ok(SubmitOutcome::Completed(summary))
            }
            Err(err) => {
                inner.session.abort_submission();
                inner.notice = Some(GENERATION_FAILED_MESSAGE.to_string());
                warn!(session = %self.id, error = %err, "summary generation failed");
                Err(SubmitError::Generation(err))
            }
        }
    }

    /// Start again from the first question.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NotComplete` unless the survey has a result.
    pub fn reset(&self) -> Result<(), SurveyError> {
        let mut inner = self.lock();
        inner.session.reset()?;
        inner.notice = None;
        debug!(session = %self.id, "survey reset");
        Ok(())
    }
}

/// Clears the submitting flag if a `submit` future is dropped mid-request,
/// e.g. by a caller-side timeout or an unmounted UI task.
struct InFlight<'a> {
    controller: &'a SurveyController,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.controller.lock().session.abort_submission();
        warn!(session = %self.controller.id, "submission abandoned before the summary arrived");
    }
}

impl fmt::Debug for SurveyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("SurveyController")
            .field("id", &self.id)
            .field("steps", &self.questions.len())
            .field("current_step", &inner.session.current_step())
            .field("is_submitting", &inner.session.is_submitting())
            .field("is_complete", &inner.session.is_complete())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
