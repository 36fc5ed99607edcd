use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CompletionCardVm, map_completion_cards};

const RECENT_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<CompletionCardVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let resource = use_resource(move || {
        let quiz_loop = quiz_loop.clone();
        async move {
            let items = quiz_loop
                .recent_completions(RECENT_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let cards = map_completion_cards(&items);
            Ok(HistoryData { cards })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No completed rounds yet." }
                    } else {
                        ul { class: "history-list",
                            for card in data.cards {
                                CompletionCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "retry",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn CompletionCard(card: CompletionCardVm) -> Element {
    rsx! {
        li {
            span { class: "history-date", "{card.completed_at_str}" }
            span { class: "history-name", "{card.participant} ({card.team})" }
            span { class: "history-score", "Score: {card.score_str}" }
        }
    }
}
