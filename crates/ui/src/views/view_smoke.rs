use std::sync::Arc;

use dioxus::prelude::ReadableExt;

use drill_core::model::{
    CompletionDraft, CompletionRecord, GeneratorPolicy, PairMatch, QuizSettings, StepInputMode,
};
use drill_core::quiz::QuizPhase;
use drill_core::time::fixed_now;
use storage::repository::{CompletionRepository, CompletionRow, Storage, StorageError};

use super::test_harness::{
    SHARE_LINK, ViewHarness, ViewKind, drive_dom, setup_view_harness,
    setup_view_harness_with_sink,
};
use crate::vm::{QuizIntent, QuizVm};

fn current_vm(harness: &ViewHarness) -> QuizVm {
    let vm = harness.handles().vm();
    harness
        .dom
        .in_runtime(|| (*vm.peek()).as_ref().ok().cloned())
        .expect("quiz started")
}

fn dispatch(harness: &mut ViewHarness, intent: QuizIntent) {
    let dispatch = harness.handles().dispatch();
    harness.dom.in_runtime(|| dispatch.call(intent));
    drive_dom(&mut harness.dom);
}

fn solve_round(harness: &mut ViewHarness) {
    loop {
        let vm = current_vm(harness);
        let snapshot = vm.snapshot();
        let (a, b) = vm.session().current_pair();
        let step = snapshot.step_index();
        let intent = match vm.phase() {
            QuizPhase::AwaitingNumberConfirmation => QuizIntent::ConfirmNumbers {
                step,
                dividend: a.to_string(),
                divisor: b.to_string(),
            },
            QuizPhase::AwaitingStepInput => QuizIntent::SubmitStep {
                step,
                quotient: (a / b).to_string(),
                remainder: (a % b).to_string(),
            },
            QuizPhase::AwaitingFinalAnswer => {
                let gcd = vm.session().terminal_gcd().expect("terminal gcd");
                QuizIntent::SubmitGcd {
                    problem: snapshot.problem_index(),
                    answer: gcd.to_string(),
                }
            }
            QuizPhase::Solved => QuizIntent::NextProblem,
            QuizPhase::AllComplete => break,
        };
        dispatch(harness, intent);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_problem() {
    let mut harness = setup_view_harness(ViewKind::Quiz, QuizSettings::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Problem 1 of 5"), "missing progress in {html}");
    assert!(html.contains("Step 1"), "missing step label in {html}");
    assert!(html.contains("Check Step"), "missing step button in {html}");
    assert!(html.contains("Score: 0 / 5"), "missing score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_rejects_unparseable_step() {
    let mut harness = setup_view_harness(ViewKind::Quiz, QuizSettings::default());
    harness.rebuild();

    dispatch(
        &mut harness,
        QuizIntent::SubmitStep {
            step: 0,
            quotient: "two".into(),
            remainder: "1".into(),
        },
    );
    let html = harness.render();
    assert!(
        html.contains("Quotient must be a whole number."),
        "missing input error in {html}"
    );
    assert!(current_vm(&harness).session().steps().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_full_round_is_submitted() {
    let mut harness = setup_view_harness(ViewKind::Quiz, QuizSettings::default());
    harness.rebuild();

    solve_round(&mut harness);
    let html = harness.render();
    assert!(html.contains("Final score: 5 / 5"), "missing final score in {html}");
    assert!(html.contains("Submit Score"), "missing submit in {html}");
    assert!(html.contains(SHARE_LINK), "missing share link in {html}");

    let submit = harness.handles().submit();
    harness
        .dom
        .in_runtime(|| submit.call(("Ada".to_string(), "Blue".to_string())));
    harness.drive_async().await;
    harness.drive_async().await;

    let rows = harness
        .storage
        .completions
        .list_recent(10)
        .await
        .expect("list completions");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.participant(), "Ada");
    assert_eq!(rows[0].record.score(), 5);

    let html = harness.render();
    assert!(html.contains("Score submitted!"), "missing confirmation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_confirm_mode_asks_for_numbers() {
    let settings = QuizSettings::new(
        2,
        StepInputMode::ConfirmPair(PairMatch::Positional),
        GeneratorPolicy::targeted(),
    )
    .unwrap();
    let mut harness = setup_view_harness(ViewKind::Quiz, settings);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Use these numbers"), "missing confirm in {html}");

    let (a, b) = current_vm(&harness).session().current_pair();
    dispatch(
        &mut harness,
        QuizIntent::ConfirmNumbers {
            step: 0,
            dividend: b.to_string(),
            divisor: a.to_string(),
        },
    );
    let html = harness.render();
    let expected = format!("Use the correct current numbers: {a} and {b}.");
    assert!(html.contains(&expected), "missing {expected} in {html}");

    solve_round(&mut harness);
    let html = harness.render();
    assert!(html.contains("Final score: 2 / 2"), "missing final score in {html}");
}

struct FailingSink;

#[async_trait::async_trait]
impl CompletionRepository for FailingSink {
    async fn append_completion(&self, _record: &CompletionRecord) -> Result<i64, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_completion(&self, _id: i64) -> Result<CompletionRecord, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_recent(&self, _limit: u32) -> Result<Vec<CompletionRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_sink_failure_is_a_warning() {
    let settings = QuizSettings::new(1, StepInputMode::Direct, GeneratorPolicy::targeted()).unwrap();
    let mut harness = setup_view_harness_with_sink(
        ViewKind::Quiz,
        settings,
        Storage::in_memory(),
        Arc::new(FailingSink),
    );
    harness.rebuild();
    solve_round(&mut harness);

    let submit = harness.handles().submit();
    harness
        .dom
        .in_runtime(|| submit.call(("Ada".to_string(), "Blue".to_string())));
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Could not save your score"),
        "missing warning in {html}"
    );
    assert!(html.contains("Final score: 1 / 1"), "missing final score in {html}");
    assert!(html.contains("Restart Practice"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_completion() {
    let mut harness = setup_view_harness(ViewKind::History, QuizSettings::default());
    let record = CompletionDraft {
        participant: "Ada".to_string(),
        team: "Blue".to_string(),
        score: 4,
        total: 5,
    }
    .validate(fixed_now())
    .unwrap();
    harness
        .storage
        .completions
        .append_completion(&record)
        .await
        .expect("append completion");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Ada (Blue)"), "missing participant in {html}");
    assert!(html.contains("Score: 4 / 5"), "missing score in {html}");
    assert!(html.contains("2023-11-14 22:13:20"), "missing timestamp in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_sink(
        ViewKind::History,
        QuizSettings::default(),
        Storage::in_memory(),
        Arc::new(FailingSink),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History, QuizSettings::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("No completed rounds yet."), "missing empty state in {html}");
}
