mod answers;
mod ids;
mod question;
mod session;
mod summary;
mod wire;

pub use answers::{AnswerSet, QaPair, SubmissionPayload};
pub use ids::SessionId;
pub use question::{QuestionSet, QuestionSetError};
pub use session::{
    INCOMPLETE_FORM_MESSAGE, REQUIRED_FIELD_MESSAGE, SessionState, SurveyError, SurveyPhase,
};
pub use summary::Summary;
pub use wire::{ErrorResponse, SummaryResponse};
