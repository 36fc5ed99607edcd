use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{HistoryView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let share_link = use_context::<AppContext>().share_link();
    rsx! {
        nav { class: "sidebar",
            h1 { "GCD Drill" }
            ul {
                li { Link { to: Route::Quiz {}, "Practice" } }
                li { Link { to: Route::History {}, "History" } }
            }
            if let Some(link) = share_link {
                div { class: "share",
                    h2 { "Open this quiz online" }
                    a { href: "{link}", "{link}" }
                }
            }
        }
    }
}
