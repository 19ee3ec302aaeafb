use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{SummaryGenerator, SurveyController};
use survey_core::model::QuestionSet;

use crate::context::AppContext;
use crate::views::SurveyView;

#[derive(Props, Clone)]
struct ViewHarnessProps {
    context: AppContext,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn SurveyHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.context.clone());
    rsx! { SurveyView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub controller: Arc<SurveyController>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn survey_controller(
    questions: &[&str],
    generator: Arc<dyn SummaryGenerator>,
) -> Arc<SurveyController> {
    let questions = QuestionSet::new(questions.iter().copied()).expect("valid questions");
    Arc::new(SurveyController::new(questions, generator))
}

/// Mount `SurveyView` over an existing controller, so tests can drive the
/// controller directly and check what the view shows for each state.
pub fn setup_view_harness(controller: &Arc<SurveyController>) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        SurveyHarness,
        ViewHarnessProps {
            context: AppContext::with_controller(Arc::clone(controller)),
        },
    );

    ViewHarness {
        dom,
        controller: Arc::clone(controller),
    }
}
