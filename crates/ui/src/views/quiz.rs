use dioxus::prelude::*;

use drill_core::quiz::QuizPhase;

use crate::context::AppContext;
#[cfg(test)]
use crate::views::ViewError;
use crate::vm::{QuizIntent, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let vm = use_signal({
        let quiz_loop = quiz_loop.clone();
        move || start_quiz(&quiz_loop)
    });
    let mut dividend_text = use_signal(String::new);
    let mut divisor_text = use_signal(String::new);
    let mut quotient_text = use_signal(String::new);
    let mut remainder_text = use_signal(String::new);
    let mut gcd_text = use_signal(String::new);
    let mut participant_text = use_signal(String::new);
    let mut team_text = use_signal(String::new);
    let submitting = use_signal(|| false);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;

            if vm.peek().is_err() {
                if intent == QuizIntent::Restart {
                    vm.set(start_quiz(&quiz_loop));
                }
                return;
            }

            let before = (*vm.peek()).as_ref().ok().map(QuizVm::snapshot);
            let applied = (*vm.write())
                .as_mut()
                .map_err(|err| *err)
                .map(|current| current.apply(&quiz_loop, intent));
            if let Ok(Err(err)) = applied {
                vm.set(Err(err));
                return;
            }

            let after = (*vm.peek()).as_ref().ok().map(QuizVm::snapshot);
            let moved = match (&before, &after) {
                (Some(before), Some(after)) => {
                    before.phase != after.phase || before.steps.len() != after.steps.len()
                }
                _ => true,
            };
            if moved {
                let mut dividend_text = dividend_text;
                let mut divisor_text = divisor_text;
                let mut quotient_text = quotient_text;
                let mut remainder_text = remainder_text;
                dividend_text.set(String::new());
                divisor_text.set(String::new());
                quotient_text.set(String::new());
                remainder_text.set(String::new());
                if after.as_ref().is_some_and(|s| s.phase != QuizPhase::AwaitingFinalAnswer) {
                    let mut gcd_text = gcd_text;
                    gcd_text.set(String::new());
                }
            }
        })
    };

    let submit_completion = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |(participant, team): (String, String)| {
            let quiz_loop = quiz_loop.clone();
            let mut vm = vm;
            let mut submitting = submitting;
            let Some(local) = (*vm.peek()).as_ref().ok().cloned() else {
                return;
            };
            submitting.set(true);
            spawn(async move {
                let mut local = local;
                local
                    .submit_completion(&quiz_loop, &participant, &team)
                    .await;
                vm.set(Ok(local));
                submitting.set(false);
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, submit_completion, vm);
            }
        }
    }

    let share_link = ctx.share_link();
    let body = match vm() {
        Err(err) => rsx! {
            p { class: "feedback feedback--error", "{err.message()}" }
            button {
                id: "quiz-retry",
                onclick: move |_| dispatch_intent.call(QuizIntent::Restart),
                "Retry"
            }
        },
        Ok(current) => {
            let snapshot = current.snapshot();
            let phase = snapshot.phase;
            let step = snapshot.step_index();
            let problem = snapshot.problem_index();
            let rows = current.step_rows();
            rsx! {
                if phase != QuizPhase::AllComplete {
                    div { class: "quiz-header",
                        h3 { "{current.progress_label()}" }
                        if let Some(prompt) = current.prompt_label() {
                            p { class: "quiz-prompt", "{prompt}" }
                        }
                        p { class: "quiz-score", "{current.score_label()}" }
                    }
                }

                if !rows.is_empty() {
                    div { class: "quiz-steps",
                        h4 { "Steps so far:" }
                        ol {
                            for row in rows {
                                li { "{row}" }
                            }
                        }
                    }
                }

                match phase {
                    QuizPhase::AwaitingNumberConfirmation => rsx! {
                        div { class: "quiz-entry",
                            h4 { "{current.step_label()}" }
                            p { "Enter the numbers to divide next." }
                            input {
                                id: "quiz-dividend",
                                placeholder: "Dividend",
                                value: "{dividend_text}",
                                oninput: move |evt| dividend_text.set(evt.value()),
                            }
                            span { " / " }
                            input {
                                id: "quiz-divisor",
                                placeholder: "Divisor",
                                value: "{divisor_text}",
                                oninput: move |evt| divisor_text.set(evt.value()),
                            }
                            button {
                                id: "quiz-confirm",
                                onclick: move |_| {
                                    dispatch_intent.call(QuizIntent::ConfirmNumbers {
                                        step,
                                        dividend: dividend_text(),
                                        divisor: divisor_text(),
                                    });
                                },
                                "Use these numbers"
                            }
                        }
                    },
                    QuizPhase::AwaitingStepInput => rsx! {
                        div { class: "quiz-entry",
                            h4 { "{current.step_label()}" }
                            p { class: "quiz-division", "{current.division_label()}" }
                            input {
                                id: "quiz-quotient",
                                placeholder: "Quotient",
                                value: "{quotient_text}",
                                oninput: move |evt| quotient_text.set(evt.value()),
                            }
                            span { " R " }
                            input {
                                id: "quiz-remainder",
                                placeholder: "Remainder",
                                value: "{remainder_text}",
                                oninput: move |evt| remainder_text.set(evt.value()),
                            }
                            button {
                                id: "quiz-check-step",
                                onclick: move |_| {
                                    dispatch_intent.call(QuizIntent::SubmitStep {
                                        step,
                                        quotient: quotient_text(),
                                        remainder: remainder_text(),
                                    });
                                },
                                "Check Step"
                            }
                        }
                    },
                    QuizPhase::AwaitingFinalAnswer => rsx! {
                        div { class: "quiz-entry",
                            h4 { "Final Step" }
                            p { "What is the GCD of the two numbers? Type your answer below:" }
                            input {
                                id: "quiz-gcd",
                                placeholder: "Your answer",
                                value: "{gcd_text}",
                                oninput: move |evt| gcd_text.set(evt.value()),
                            }
                            button {
                                id: "quiz-check-gcd",
                                onclick: move |_| {
                                    dispatch_intent.call(QuizIntent::SubmitGcd {
                                        problem,
                                        answer: gcd_text(),
                                    });
                                },
                                "Check GCD"
                            }
                        }
                    },
                    QuizPhase::Solved => rsx! {
                        button {
                            id: "quiz-next",
                            onclick: move |_| dispatch_intent.call(QuizIntent::NextProblem),
                            if snapshot.is_last_problem() { "See Results" } else { "Next Problem" }
                        }
                    },
                    QuizPhase::AllComplete => rsx! {
                        div { class: "quiz-complete",
                            h3 { "All done!" }
                            p { class: "quiz-final", "{current.final_label()}" }
                            if let Some(id) = current.saved_completion() {
                                p { class: "quiz-saved", "Saved as entry #{id}." }
                            } else {
                                input {
                                    id: "quiz-participant",
                                    placeholder: "Your name",
                                    value: "{participant_text}",
                                    oninput: move |evt| participant_text.set(evt.value()),
                                }
                                input {
                                    id: "quiz-team",
                                    placeholder: "Your team",
                                    value: "{team_text}",
                                    oninput: move |evt| team_text.set(evt.value()),
                                }
                                button {
                                    id: "quiz-submit",
                                    disabled: submitting(),
                                    onclick: move |_| submit_completion.call((participant_text(), team_text())),
                                    "Submit Score"
                                }
                            }
                            button {
                                id: "quiz-restart",
                                disabled: submitting(),
                                onclick: move |_| dispatch_intent.call(QuizIntent::Restart),
                                "Restart Practice"
                            }
                            if let Some(link) = share_link.as_deref() {
                                p { class: "quiz-share", "Share this quiz: {link}" }
                            }
                        }
                    },
                }

                if let Some(feedback) = current.feedback() {
                    p { class: "{feedback.class()}", "{feedback.text}" }
                }
            }
        }
    };

    rsx! {
        div { class: "page quiz",
            h2 { "Euclidean Division Practice" }
            {body}
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    submit: Rc<RefCell<Option<Callback<(String, String)>>>>,
    vm: Rc<RefCell<Option<Signal<Result<QuizVm, ViewError>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        submit: Callback<(String, String)>,
        vm: Signal<Result<QuizVm, ViewError>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.submit.borrow_mut() = Some(submit);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn submit(&self) -> Callback<(String, String)> {
        (*self.submit.borrow()).expect("quiz submit registered")
    }

    pub(crate) fn vm(&self) -> Signal<Result<QuizVm, ViewError>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
