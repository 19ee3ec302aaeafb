use std::sync::Arc;

use services::{SummaryGenerator, SurveyController};
use survey_core::model::QuestionSet;

pub trait UiApp: Send + Sync {
    fn questions(&self) -> QuestionSet;
    fn summary_generator(&self) -> Arc<dyn SummaryGenerator>;
}

#[derive(Clone)]
pub struct AppContext {
    survey: Arc<SurveyController>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let survey = SurveyController::new(app.questions(), app.summary_generator());
        Self {
            survey: Arc::new(survey),
        }
    }

    /// Wrap an existing controller, e.g. one a test keeps a handle to.
    #[must_use]
    pub fn with_controller(survey: Arc<SurveyController>) -> Self {
        Self { survey }
    }

    #[must_use]
    pub fn survey(&self) -> Arc<SurveyController> {
        Arc::clone(&self.survey)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
