mod survey_vm;

pub use survey_vm::{
    IntentOutcome, StepMarkerVm, StepState, SubmitStatus, SurveyIntent, SurveyScreenVm, SurveyVm,
    map_survey_screen,
};
