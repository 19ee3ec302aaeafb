use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::SurveyView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", SurveyView)] Survey {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "app-header",
                h1 { "Career Profile" }
                p { class: "app-header__subtitle",
                    "Answer a few questions to get a professional summary."
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
