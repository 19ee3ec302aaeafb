use serde::Serialize;

use survey_core::model::{QuestionSet, SessionState};

/// Everything a renderer needs to draw the survey, copied out of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveySnapshot {
    pub current_step: usize,
    pub total_steps: usize,
    pub question: String,
    pub answer: String,
    pub validation_error: Option<String>,
    /// Form-level message from the last failed submission, if any.
    pub notice: Option<String>,
    pub is_submitting: bool,
    pub is_complete: bool,
    pub result: Option<String>,
    pub progress_percent: u8,
    pub is_first_step: bool,
    pub is_last_step: bool,
}

impl SurveySnapshot {
    pub(crate) fn capture(
        questions: &QuestionSet,
        state: &SessionState,
        notice: Option<&str>,
    ) -> Self {
        Self {
            current_step: state.current_step(),
            total_steps: state.total_steps(),
            question: questions
                .get(state.current_step())
                .unwrap_or_default()
                .to_string(),
            answer: state.current_answer().to_string(),
            validation_error: state.validation_error().map(str::to_string),
            notice: notice.map(str::to_string),
            is_submitting: state.is_submitting(),
            is_complete: state.is_complete(),
            result: state.result().map(|summary| summary.text().to_string()),
            progress_percent: state.progress_percent(),
            is_first_step: state.is_first_step(),
            is_last_step: state.is_last_step(),
        }
    }

    /// 1-based position for display, e.g. "Q3".
    #[must_use]
    pub fn step_number(&self) -> usize {
        self.current_step + 1
    }
}
