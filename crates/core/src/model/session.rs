use serde::Serialize;
use thiserror::Error;

use crate::model::{AnswerSet, QuestionSet, SubmissionPayload, Summary};

/// Inline message shown when moving forward from a blank answer.
pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required";

/// Message shown when submitting while any answer is still blank.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please complete all questions before submitting.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurveyError {
    #[error("{}", REQUIRED_FIELD_MESSAGE)]
    Required { step: usize },

    #[error("{}", INCOMPLETE_FORM_MESSAGE)]
    IncompleteForm { blank_steps: Vec<usize> },

    #[error("submission is only possible from the last question")]
    NotLastStep,

    #[error("a summary request is already in flight")]
    Submitting,

    #[error("survey already completed")]
    Completed,

    #[error("survey is not complete yet")]
    NotComplete,
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse state of a survey session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SurveyPhase {
    Answering { step: usize },
    Complete,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// All mutable state of one survey session.
///
/// The session is complete exactly when it holds a result. `is_submitting` is
/// only true between `begin_submission` and `complete_submission` /
/// `abort_submission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    current_step: usize,
    answers: AnswerSet,
    validation_error: Option<String>,
    is_submitting: bool,
    result: Option<Summary>,
}

impl SessionState {
    /// Fresh session positioned on the first question with blank answers.
    #[must_use]
    pub fn new(questions: &QuestionSet) -> Self {
        Self {
            current_step: 0,
            answers: AnswerSet::for_questions(questions),
            validation_error: None,
            is_submitting: false,
            result: None,
        }
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    #[must_use]
    pub fn current_answer(&self) -> &str {
        self.answers.get(self.current_step).unwrap_or_default()
    }

    #[must_use]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn result(&self) -> Option<&Summary> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.answers.len()
    }

    #[must_use]
    pub fn phase(&self) -> SurveyPhase {
        if self.is_complete() {
            SurveyPhase::Complete
        } else {
            SurveyPhase::Answering {
                step: self.current_step,
            }
        }
    }

    /// 100 once complete, otherwise the share of questions already passed,
    /// rounded half up.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.is_complete() {
            return 100;
        }
        let total = self.answers.len().max(1);
        let percent = (200 * self.current_step + total) / (2 * total);
        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    fn ensure_editable(&self) -> Result<(), SurveyError> {
        if self.is_complete() {
            return Err(SurveyError::Completed);
        }
        if self.is_submitting {
            return Err(SurveyError::Submitting);
        }
        Ok(())
    }

    /// Overwrite the answer on the current question.
    ///
    /// A non-blank answer clears any pending validation error. Blank answers
    /// are stored as-is; blankness is only checked on `advance` and at submission.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Completed` or `SurveyError::Submitting` when the
    /// session is not accepting edits.
    pub fn record_answer(&mut self, text: impl Into<String>) -> Result<(), SurveyError> {
        self.ensure_editable()?;
        let text = text.into();
        if !text.trim().is_empty() {
            self.validation_error = None;
        }
        self.answers.record(self.current_step, text);
        Ok(())
    }

    /// Move to the next question if the current answer is non-blank.
    ///
    /// On the last question this only validates. Returns the resulting step.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Required` (and records the inline message) when the
    /// current answer is blank.
    pub fn advance(&mut self) -> Result<usize, SurveyError> {
        self.ensure_editable()?;
        if self.answers.is_blank(self.current_step) {
            self.validation_error = Some(REQUIRED_FIELD_MESSAGE.to_string());
            return Err(SurveyError::Required {
                step: self.current_step,
            });
        }
        self.validation_error = None;
        if !self.is_last_step() {
            self.current_step += 1;
        }
        Ok(self.current_step)
    }

    /// Move back one question without validating. Returns the resulting step.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Completed` or `SurveyError::Submitting` when the
    /// session is not accepting navigation.
    pub fn retreat(&mut self) -> Result<usize, SurveyError> {
        self.ensure_editable()?;
        self.current_step = self.current_step.saturating_sub(1);
        self.validation_error = None;
        Ok(self.current_step)
    }

    /// Check every answer and mark the session as submitting.
    ///
    /// Nothing changes when this fails.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::IncompleteForm` if any answer is blank,
    /// `SurveyError::NotLastStep` before the last question, and
    /// `SurveyError::Completed` / `SurveyError::Submitting` for lifecycle conflicts.
    pub fn begin_submission(
        &mut self,
        questions: &QuestionSet,
    ) -> Result<SubmissionPayload, SurveyError> {
        self.ensure_editable()?;
        if !self.is_last_step() {
            return Err(SurveyError::NotLastStep);
        }
        let blank_steps = self.answers.blank_steps();
        if !blank_steps.is_empty() {
            return Err(SurveyError::IncompleteForm { blank_steps });
        }

        self.is_submitting = true;
        self.validation_error = None;
        Ok(SubmissionPayload::zip(questions, &self.answers))
    }

    /// Store the generated summary; the session becomes complete.
    pub fn complete_submission(&mut self, summary: Summary) {
        self.is_submitting = false;
        self.result = Some(summary);
    }

    /// Leave the submitting state after a failed request. Step and answers are kept.
    pub fn abort_submission(&mut self) {
        self.is_submitting = false;
    }

    /// Start over from the first question with blank answers.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NotComplete` unless the session holds a result.
    pub fn reset(&mut self) -> Result<(), SurveyError> {
        if !self.is_complete() {
            return Err(SurveyError::NotComplete);
        }
        let total = self.answers.len();
        self.current_step = 0;
        self.answers = AnswerSet::blank(total);
        self.validation_error = None;
        self.is_submitting = false;
        self.result = None;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
