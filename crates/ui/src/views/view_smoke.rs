use std::sync::Arc;

use async_trait::async_trait;
use services::{SummaryError, SummaryGenerator, UpstreamError};
use survey_core::model::{INCOMPLETE_FORM_MESSAGE, QaPair, Summary};
use tokio::sync::Notify;

use super::test_harness::{setup_view_harness, survey_controller};

const QUESTIONS: [&str; 3] = [
    "What is your full name?",
    "What is your current job title?",
    "What type of role are you looking for?",
];

struct Canned(Result<&'static str, ()>);

#[async_trait]
impl SummaryGenerator for Canned {
    async fn generate(&self, _pairs: &[QaPair]) -> Result<Summary, SummaryError> {
        match self.0 {
            Ok(text) => Ok(Summary::new(text)),
            Err(()) => Err(SummaryError::Upstream(UpstreamError::Timeout)),
        }
    }
}

struct Gated {
    gate: Notify,
}

#[async_trait]
impl SummaryGenerator for Gated {
    async fn generate(&self, _pairs: &[QaPair]) -> Result<Summary, SummaryError> {
        self.gate.notified().await;
        Ok(Summary::new("Released."))
    }
}

fn answer_through_last(controller: &services::SurveyController) {
    for (step, text) in ["Alex", "Welder", "Lead"].into_iter().enumerate() {
        controller.record_answer(text).unwrap();
        if step + 1 < QUESTIONS.len() {
            controller.advance().unwrap();
        }
    }
}

#[tokio::test(flavor = "current_thread")]
async fn first_question_renders_steps_and_progress() {
    let controller = survey_controller(&QUESTIONS, Arc::new(Canned(Ok("unused"))));
    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();

    for marker in ["Q1", "Q2", "Q3"] {
        assert!(html.contains(marker), "missing {marker} in {html}");
    }
    assert!(html.contains("What is your full name?"), "missing question in {html}");
    assert!(html.contains("Question 1 of 3"), "missing step label in {html}");
    assert!(html.contains("0%"), "missing progress in {html}");
    assert!(html.contains("Prev"), "missing prev in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
    assert!(!html.contains("Professional Summary"), "unexpected summary in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn blank_advance_shows_required_message() {
    let controller = survey_controller(&QUESTIONS, Arc::new(Canned(Ok("unused"))));
    controller.advance().unwrap_err();

    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("This field is required"), "missing error in {html}");
    assert!(html.contains("Question 1 of 3"), "step moved in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn last_question_offers_submit() {
    let controller = survey_controller(&QUESTIONS, Arc::new(Canned(Ok("unused"))));
    answer_through_last(&controller);

    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Submit"), "missing submit in {html}");
    assert!(html.contains("67%"), "missing progress in {html}");
    assert!(html.contains("Lead"), "missing current answer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn in_flight_submit_shows_submitting_label() {
    let generator = Arc::new(Gated {
        gate: Notify::new(),
    });
    let controller = survey_controller(&QUESTIONS, generator.clone());
    answer_through_last(&controller);

    let submit = controller.submit();
    let observe = async {
        while !controller.state().is_submitting() {
            tokio::task::yield_now().await;
        }
        let mut harness = setup_view_harness(&controller);
        harness.rebuild();
        let html = harness.render();
        generator.gate.notify_one();
        html
    };
    let (outcome, html) = tokio::join!(submit, observe);

    assert!(html.contains("Submitting..."), "missing submitting label in {html}");
    assert!(outcome.is_ok());
    assert_eq!(
        controller.snapshot().result.as_deref(),
        Some("Released.")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn completed_survey_renders_summary_card() {
    let controller = survey_controller(
        &QUESTIONS,
        Arc::new(Canned(Ok("Alex is a welder ready to lead."))),
    );
    answer_through_last(&controller);
    controller.submit().await.unwrap();

    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Professional Summary"), "missing title in {html}");
    assert!(html.contains("Alex is a welder ready to lead."), "missing text in {html}");
    assert!(html.contains("Start Again"), "missing reset in {html}");
    assert!(!html.contains("Prev"), "stepper still visible in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_submit_keeps_answers_and_shows_notice() {
    let controller = survey_controller(&QUESTIONS, Arc::new(Canned(Err(()))));
    answer_through_last(&controller);
    controller.submit().await.unwrap_err();

    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Failed to generate summary"), "missing notice in {html}");
    assert!(html.contains("Lead"), "answer lost in {html}");
    assert!(html.contains("Submit"), "missing retry in {html}");
    assert!(!html.contains("Submitting..."), "still submitting in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn blank_answer_at_submit_shows_incomplete_notice() {
    let controller = survey_controller(&QUESTIONS, Arc::new(Canned(Ok("unused"))));
    answer_through_last(&controller);
    controller.record_answer("   ").unwrap();
    controller.submit().await.unwrap_err();

    let mut harness = setup_view_harness(&controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains(INCOMPLETE_FORM_MESSAGE), "missing notice in {html}");
    assert!(!html.contains("Professional Summary"), "unexpected summary in {html}");
    assert!(html.contains("Question 3 of 3"), "step moved in {html}");
}
