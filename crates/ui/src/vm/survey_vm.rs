use std::sync::Arc;

use services::{SubmitError, SubmitOutcome, SurveyController, SurveySnapshot};
use survey_core::model::SurveyError;
use tracing::debug;

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyIntent {
    Edit(String),
    Prev,
    Next,
    StartAgain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied,
    /// The controller refused the step; its validation message is now set.
    Invalid,
    Ignored,
    /// `Next` on the last question: the caller should run `submit`.
    SubmitRequested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitStatus {
    Completed,
    InFlight,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepMarkerVm {
    pub label: String,
    pub state: StepState,
}

impl StepMarkerVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.state {
            StepState::Done => "survey-step survey-step--done",
            StepState::Current => "survey-step survey-step--current",
            StepState::Upcoming => "survey-step",
        }
    }
}

/// Render-ready fields for the survey screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyScreenVm {
    pub steps: Vec<StepMarkerVm>,
    pub progress_percent: u8,
    pub progress_label: String,
    pub step_label: String,
    pub question: String,
    pub answer: String,
    pub validation_error: Option<String>,
    pub notice: Option<String>,
    pub prev_disabled: bool,
    pub primary_label: &'static str,
    pub primary_disabled: bool,
    pub input_disabled: bool,
    pub summary: Option<String>,
}

/// `pending_submit` covers the gap between the click and the controller
/// flagging the request as in flight.
#[must_use]
pub fn map_survey_screen(snapshot: &SurveySnapshot, pending_submit: bool) -> SurveyScreenVm {
    let submitting = snapshot.is_submitting || pending_submit;
    let steps = (0..snapshot.total_steps)
        .map(|index| {
            let state = if snapshot.is_complete || index < snapshot.current_step {
                StepState::Done
            } else if index == snapshot.current_step {
                StepState::Current
            } else {
                StepState::Upcoming
            };
            StepMarkerVm {
                label: format!("Q{}", index + 1),
                state,
            }
        })
        .collect();

    let primary_label = if submitting {
        "Submitting..."
    } else if snapshot.is_last_step {
        "Submit"
    } else {
        "Next"
    };

    SurveyScreenVm {
        steps,
        progress_percent: snapshot.progress_percent,
        progress_label: format!("{}%", snapshot.progress_percent),
        step_label: format!(
            "Question {} of {}",
            snapshot.step_number(),
            snapshot.total_steps
        ),
        question: snapshot.question.clone(),
        answer: snapshot.answer.clone(),
        validation_error: snapshot.validation_error.clone(),
        notice: snapshot.notice.clone(),
        prev_disabled: snapshot.is_first_step || submitting,
        primary_label,
        primary_disabled: submitting,
        input_disabled: submitting,
        summary: snapshot.result.clone(),
    }
}

#[derive(Clone)]
pub struct SurveyVm {
    controller: Arc<SurveyController>,
}

impl SurveyVm {
    #[must_use]
    pub fn new(controller: Arc<SurveyController>) -> Self {
        Self { controller }
    }

    #[must_use]
    pub fn screen(&self, pending_submit: bool) -> SurveyScreenVm {
        map_survey_screen(&self.controller.snapshot(), pending_submit)
    }

    pub fn apply(&self, intent: SurveyIntent) -> IntentOutcome {
        let result = match intent {
            SurveyIntent::Edit(text) => self.controller.record_answer(text),
            SurveyIntent::Prev => self.controller.retreat().map(drop),
            SurveyIntent::Next => {
                let state = self.controller.state();
                // Submission checks every answer, not just the current one.
                if state.is_last_step() && !state.is_complete() {
                    return IntentOutcome::SubmitRequested;
                }
                self.controller.advance().map(drop)
            }
            SurveyIntent::StartAgain => self.controller.reset(),
        };

        match result {
            Ok(()) => IntentOutcome::Applied,
            Err(SurveyError::Required { .. }) => IntentOutcome::Invalid,
            Err(err) => {
                debug!(error = %err, "survey intent ignored");
                IntentOutcome::Ignored
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Generation` when the summary could not be produced.
    pub async fn submit(&self) -> Result<SubmitStatus, ViewError> {
        match self.controller.submit().await {
            Ok(SubmitOutcome::Completed(_)) => Ok(SubmitStatus::Completed),
            Ok(SubmitOutcome::AlreadySubmitting) => Ok(SubmitStatus::InFlight),
            Err(SubmitError::Survey(_)) => Ok(SubmitStatus::Rejected),
            Err(SubmitError::Generation(_)) => Err(ViewError::Generation),
            Err(_) => Err(ViewError::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use services::{SummaryError, SummaryGenerator, UpstreamError};
    use survey_core::model::{INCOMPLETE_FORM_MESSAGE, QaPair, QuestionSet, Summary};

    use super::*;

    struct CannedGenerator(Option<&'static str>);

    #[async_trait]
    impl SummaryGenerator for CannedGenerator {
        async fn generate(&self, _pairs: &[QaPair]) -> Result<Summary, SummaryError> {
            self.0
                .map(Summary::new)
                .ok_or(SummaryError::Upstream(UpstreamError::Timeout))
        }
    }

    fn vm(reply: Option<&'static str>) -> SurveyVm {
        let questions = QuestionSet::new(["Name?", "Role?", "Goal?"]).unwrap();
        SurveyVm::new(Arc::new(SurveyController::new(
            questions,
            Arc::new(CannedGenerator(reply)),
        )))
    }

    fn answer_all(vm: &SurveyVm) {
        for text in ["Alex", "Welder", "Lead"] {
            assert_eq!(vm.apply(SurveyIntent::Edit(text.into())), IntentOutcome::Applied);
            if vm.apply(SurveyIntent::Next) == IntentOutcome::SubmitRequested {
                break;
            }
        }
    }

    #[test]
    fn first_screen_has_markers_and_zero_progress() {
        let screen = vm(None).screen(false);
        let labels: Vec<_> = screen.steps.iter().map(|step| step.label.as_str()).collect();
        assert_eq!(labels, ["Q1", "Q2", "Q3"]);
        assert_eq!(screen.steps[0].state, StepState::Current);
        assert_eq!(screen.steps[1].state, StepState::Upcoming);
        assert_eq!(screen.progress_label, "0%");
        assert_eq!(screen.step_label, "Question 1 of 3");
        assert_eq!(screen.question, "Name?");
        assert!(screen.prev_disabled);
        assert_eq!(screen.primary_label, "Next");
    }

    #[test]
    fn blank_next_is_invalid_and_shows_the_message() {
        let vm = vm(None);
        assert_eq!(vm.apply(SurveyIntent::Next), IntentOutcome::Invalid);
        let screen = vm.screen(false);
        assert_eq!(screen.validation_error.as_deref(), Some("This field is required"));
        assert_eq!(screen.step_label, "Question 1 of 3");
    }

    #[test]
    fn last_step_turns_next_into_submit() {
        let vm = vm(None);
        answer_all(&vm);
        let screen = vm.screen(false);
        assert_eq!(screen.primary_label, "Submit");
        assert_eq!(screen.progress_label, "67%");
        assert_eq!(screen.steps[1].state, StepState::Done);
        assert_eq!(vm.apply(SurveyIntent::Next), IntentOutcome::SubmitRequested);

        let pending = vm.screen(true);
        assert_eq!(pending.primary_label, "Submitting...");
        assert!(pending.primary_disabled);
        assert!(pending.prev_disabled);
        assert!(pending.input_disabled);
    }

    #[tokio::test]
    async fn successful_submit_completes_the_screen() {
        let vm = vm(Some("Alex leads welding teams."));
        answer_all(&vm);
        assert_eq!(vm.submit().await, Ok(SubmitStatus::Completed));

        let screen = vm.screen(false);
        assert_eq!(screen.summary.as_deref(), Some("Alex leads welding teams."));
        assert_eq!(screen.progress_label, "100%");
        assert!(screen.steps.iter().all(|step| step.state == StepState::Done));

        assert_eq!(vm.apply(SurveyIntent::Edit("late".into())), IntentOutcome::Ignored);
        assert_eq!(vm.apply(SurveyIntent::StartAgain), IntentOutcome::Applied);
        let fresh = vm.screen(false);
        assert_eq!(fresh.summary, None);
        assert_eq!(fresh.answer, "");
        assert_eq!(fresh.step_label, "Question 1 of 3");
    }

    #[tokio::test]
    async fn failed_submit_reports_generation_error() {
        let vm = vm(None);
        answer_all(&vm);
        assert_eq!(vm.submit().await, Err(ViewError::Generation));

        let screen = vm.screen(false);
        assert_eq!(screen.notice.as_deref(), Some("Failed to generate summary"));
        assert_eq!(screen.primary_label, "Submit");
        assert_eq!(screen.answer, "Lead");
    }

    #[tokio::test]
    async fn blank_last_question_reports_the_incomplete_form() {
        let vm = vm(Some("unused"));
        answer_all(&vm);
        assert_eq!(vm.apply(SurveyIntent::Edit("  ".into())), IntentOutcome::Applied);
        assert_eq!(vm.apply(SurveyIntent::Next), IntentOutcome::SubmitRequested);
        assert_eq!(vm.submit().await, Ok(SubmitStatus::Rejected));

        let screen = vm.screen(false);
        assert_eq!(screen.notice.as_deref(), Some(INCOMPLETE_FORM_MESSAGE));
        assert_eq!(screen.summary, None);
        assert_eq!(screen.step_label, "Question 3 of 3");
    }

    #[test]
    fn start_again_is_ignored_before_completion() {
        assert_eq!(vm(None).apply(SurveyIntent::StartAgain), IntentOutcome::Ignored);
    }
}
