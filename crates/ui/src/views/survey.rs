use dioxus::prelude::*;
use tracing::debug;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{IntentOutcome, SurveyIntent, SurveyVm};

#[component]
pub fn SurveyView() -> Element {
    let ctx = use_context::<AppContext>();
    let vm = use_hook(|| SurveyVm::new(ctx.survey()));
    let revision = use_signal(|| 0_u64);
    let pending_submit = use_signal(|| false);
    let submit_error = use_signal(|| None::<ViewError>);

    let dispatch_intent = {
        let vm = vm.clone();
        use_callback(move |intent: SurveyIntent| {
            let mut revision = revision;
            let mut pending_submit = pending_submit;
            let mut submit_error = submit_error;

            let outcome = vm.apply(intent);
            if outcome == IntentOutcome::SubmitRequested {
                // The button is disabled while pending, but keyboard submits can still race.
                if pending_submit() {
                    return;
                }
                pending_submit.set(true);
                let vm = vm.clone();
                spawn(async move {
                    let result = vm.submit().await;
                    debug!(?result, "survey submit finished");
                    pending_submit.set(false);
                    submit_error.set(result.err());
                    *revision.write() += 1;
                });
            } else if outcome == IntentOutcome::Applied {
                submit_error.set(None);
            }
            *revision.write() += 1;
        })
    };

    let _revision = revision();
    let screen = vm.screen(pending_submit());
    let fallback_error = submit_error()
        .filter(|_| screen.notice.is_none())
        .map(ViewError::message);

    rsx! {
        section { class: "survey", id: "survey-root",
            if let Some(summary) = screen.summary.clone() {
                SummaryCard {
                    summary,
                    on_start_again: move |()| dispatch_intent.call(SurveyIntent::StartAgain),
                }
            } else {
                ol { class: "survey-steps",
                    for step in screen.steps.iter() {
                        li { key: "{step.label}", class: step.class(), "{step.label}" }
                    }
                }
                div { class: "survey-progress",
                    div { class: "survey-progress__bar",
                        div {
                            class: "survey-progress__fill",
                            style: "width: {screen.progress_percent}%",
                        }
                    }
                    span { class: "survey-progress__label", "{screen.progress_label}" }
                }
                div { class: "survey-card",
                    p { class: "survey-card__step", "{screen.step_label}" }
                    label {
                        class: "survey-card__question",
                        r#for: "survey-answer",
                        "{screen.question}"
                    }
                    input {
                        class: "survey-card__input",
                        id: "survey-answer",
                        r#type: "text",
                        value: "{screen.answer}",
                        disabled: screen.input_disabled,
                        oninput: move |evt| dispatch_intent.call(SurveyIntent::Edit(evt.value())),
                        onkeydown: move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                evt.prevent_default();
                                dispatch_intent.call(SurveyIntent::Next);
                            }
                        },
                    }
                    if let Some(message) = screen.validation_error.clone() {
                        p { class: "survey-card__error", "{message}" }
                    }
                }
                div { class: "survey-actions",
                    button {
                        class: "btn btn-secondary",
                        id: "survey-prev",
                        r#type: "button",
                        disabled: screen.prev_disabled,
                        onclick: move |_| dispatch_intent.call(SurveyIntent::Prev),
                        "Prev"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "survey-next",
                        r#type: "button",
                        disabled: screen.primary_disabled,
                        onclick: move |_| dispatch_intent.call(SurveyIntent::Next),
                        "{screen.primary_label}"
                    }
                }
                if let Some(notice) = screen.notice.clone() {
                    p { class: "survey-notice", "{notice}" }
                } else if let Some(message) = fallback_error {
                    p { class: "survey-notice", "{message}" }
                }
            }
        }
    }
}

#[component]
fn SummaryCard(summary: String, on_start_again: EventHandler<()>) -> Element {
    rsx! {
        div { class: "summary-card",
            h2 { class: "summary-card__title", "Professional Summary" }
            p { class: "summary-card__text", "{summary}" }
            button {
                class: "btn btn-primary",
                id: "survey-start-again",
                r#type: "button",
                onclick: move |_| on_start_again.call(()),
                "Start Again"
            }
        }
    }
}
