// tests/orchestrator_core.rs

use std::time::Duration;

use livetex::compile::{CompileOutcome, CompileRequest, TransportError};
use livetex::engine::{
    CoreCommand, CoreEvent, CoreOrchestrator, CoreStep, OrchestratorOptions, OrchestratorState,
};
use livetex::types::RenderOption;
use livetex_test_utils::builders::{detail_response, document, pdf_response, FAKE_PDF};
use livetex_test_utils::init_tracing;

const SANS: RenderOption = RenderOption::LiberationSans;
const SERIF: RenderOption = RenderOption::LiberationSerif;

fn options() -> OrchestratorOptions {
    OrchestratorOptions {
        debounce: Duration::from_millis(1000),
        exit_when_idle: false,
    }
}

fn scheduled_generation(step: &CoreStep) -> u64 {
    match step.commands.as_slice() {
        [CoreCommand::ScheduleDebounce { generation, delay }] => {
            assert_eq!(*delay, Duration::from_millis(1000));
            *generation
        }
        other => panic!("expected a single ScheduleDebounce, got {other:?}"),
    }
}

fn sent_request(step: &CoreStep) -> Option<(u64, CompileRequest)> {
    step.commands.iter().find_map(|c| match c {
        CoreCommand::SendCompile { seq, request } => Some((*seq, request.clone())),
        _ => None,
    })
}

fn presented(step: &CoreStep) -> Option<&CompileOutcome> {
    step.commands.iter().find_map(|c| match c {
        CoreCommand::Present(outcome) => Some(outcome),
        _ => None,
    })
}

fn edit(core: &mut CoreOrchestrator, text: &str, option: RenderOption) -> u64 {
    let step = core.step(CoreEvent::DocumentChanged(document(text, option)));
    scheduled_generation(&step)
}

fn elapse(core: &mut CoreOrchestrator, generation: u64) -> CoreStep {
    core.step(CoreEvent::DebounceElapsed { generation })
}

/// Start, let the first timer elapse, and succeed the resulting request.
fn compiled(text: &str, option: RenderOption) -> CoreOrchestrator {
    let mut core = CoreOrchestrator::new(document(text, option), options());
    let generation = scheduled_generation(&core.start());
    let (seq, _) = sent_request(&elapse(&mut core, generation)).expect("initial compile");
    core.step(CoreEvent::CompileFinished {
        seq,
        result: Ok(pdf_response(FAKE_PDF)),
    });
    assert_eq!(core.state(), OrchestratorState::Idle);
    core
}

#[test]
fn burst_of_edits_sends_one_request_for_the_last_edit() {
    init_tracing();

    let mut core = CoreOrchestrator::new(document("", SANS), options());
    let first = scheduled_generation(&core.start());
    assert_eq!(core.state(), OrchestratorState::Pending);

    let g1 = edit(&mut core, "a", SANS);
    let g2 = edit(&mut core, "ab", SANS);
    let g3 = edit(&mut core, "abc", SANS);
    assert!(first < g1 && g1 < g2 && g2 < g3);

    // Timers from before the last edit are ignored.
    for old in [first, g1, g2] {
        let step = elapse(&mut core, old);
        assert!(step.commands.is_empty(), "stale timer produced {:?}", step.commands);
        assert_eq!(core.state(), OrchestratorState::Pending);
    }

    let step = elapse(&mut core, g3);
    assert_eq!(step.commands.len(), 2);
    assert_eq!(step.commands[0], CoreCommand::SetCompiling(true));
    let (seq, request) = sent_request(&step).expect("request sent");
    assert_eq!(seq, 1);
    assert_eq!(request.text, "abc");
    assert_eq!(core.state(), OrchestratorState::InFlight);

    // The same timer firing twice does nothing.
    assert!(elapse(&mut core, g3).commands.is_empty());
}

#[test]
fn edit_back_to_last_compiled_text_sends_nothing() {
    init_tracing();

    let mut core = compiled("X", SANS);

    edit(&mut core, "", SANS);
    let g = edit(&mut core, "X", SANS);

    let step = elapse(&mut core, g);
    assert!(sent_request(&step).is_none());
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert_eq!(core.state(), OrchestratorState::Idle);
}

#[test]
fn render_option_round_trip_sends_nothing() {
    init_tracing();

    let mut core = compiled("X", SANS);

    edit(&mut core, "X", SERIF);
    let g = edit(&mut core, "X", SANS);

    assert!(sent_request(&elapse(&mut core, g)).is_none());
}

#[test]
fn render_option_change_alone_triggers_compile() {
    init_tracing();

    let mut core = compiled("X", SANS);

    let g = edit(&mut core, "X", SERIF);
    let (_, request) = sent_request(&elapse(&mut core, g)).expect("request sent");
    assert_eq!(request.render_option, SERIF);
    assert_eq!(request.text, "X");
}

#[test]
fn superseded_response_arriving_last_is_dropped() {
    init_tracing();

    let mut core = CoreOrchestrator::new(document("one", SANS), options());
    let g = scheduled_generation(&core.start());
    let (r1, _) = sent_request(&elapse(&mut core, g)).unwrap();

    let g = edit(&mut core, "two", SANS);
    assert_eq!(core.state(), OrchestratorState::InFlightPendingAgain);
    let (r2, req2) = sent_request(&elapse(&mut core, g)).unwrap();
    assert!(r2 > r1);

    let step = core.step(CoreEvent::CompileFinished {
        seq: r2,
        result: Ok(pdf_response(b"%PDF two")),
    });
    assert!(matches!(presented(&step), Some(CompileOutcome::Success(a)) if a.bytes == b"%PDF two"));
    assert!(step.commands.contains(&CoreCommand::SetCompiling(false)));
    assert_eq!(core.last_compiled(), Some(&req2));

    let step = core.step(CoreEvent::CompileFinished {
        seq: r1,
        result: Ok(pdf_response(b"%PDF one")),
    });
    assert!(step.commands.is_empty(), "stale response applied: {:?}", step.commands);
    assert_eq!(core.last_compiled(), Some(&req2));
    assert_eq!(core.state(), OrchestratorState::Idle);
}

#[test]
fn superseded_response_arriving_first_is_dropped() {
    init_tracing();

    let mut core = CoreOrchestrator::new(document("one", SANS), options());
    let g = scheduled_generation(&core.start());
    let (r1, _) = sent_request(&elapse(&mut core, g)).unwrap();
    let g = edit(&mut core, "two", SANS);
    let (r2, _) = sent_request(&elapse(&mut core, g)).unwrap();

    // The older request answers first, even with an error: nothing happens,
    // and the compiling flag stays on for the newer request.
    let step = core.step(CoreEvent::CompileFinished {
        seq: r1,
        result: Err(TransportError::new("connection reset")),
    });
    assert!(step.commands.is_empty());
    assert_eq!(core.state(), OrchestratorState::InFlight);

    let step = core.step(CoreEvent::CompileFinished {
        seq: r2,
        result: Ok(pdf_response(FAKE_PDF)),
    });
    assert!(matches!(presented(&step), Some(CompileOutcome::Success(_))));
}

#[test]
fn same_snapshot_as_in_flight_request_is_not_resent() {
    init_tracing();

    let mut core = CoreOrchestrator::new(document("X", SANS), options());
    let g = scheduled_generation(&core.start());
    let (r1, _) = sent_request(&elapse(&mut core, g)).unwrap();

    edit(&mut core, "Xa", SANS);
    let g = edit(&mut core, "X", SANS);
    assert!(sent_request(&elapse(&mut core, g)).is_none());

    // The original request is still the authoritative one.
    let step = core.step(CoreEvent::CompileFinished {
        seq: r1,
        result: Ok(pdf_response(FAKE_PDF)),
    });
    assert!(presented(&step).is_some());
}

#[test]
fn failure_is_presented_and_not_recorded_as_compiled() {
    init_tracing();

    let mut core = compiled("X", SANS);

    let g = edit(&mut core, "\\broken", SANS);
    let (seq, _) = sent_request(&elapse(&mut core, g)).unwrap();
    let step = core.step(CoreEvent::CompileFinished {
        seq,
        result: Ok(detail_response(400, "Undefined control sequence")),
    });
    match presented(&step) {
        Some(CompileOutcome::Failure(err)) => {
            assert_eq!(err.to_string(), "Undefined control sequence")
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(core.last_compiled().map(|r| r.text.as_str()), Some("X"));

    // The failed text is sent again after an edit round trip.
    edit(&mut core, "\\broken!", SANS);
    let g = edit(&mut core, "\\broken", SANS);
    assert!(sent_request(&elapse(&mut core, g)).is_some());
}

#[test]
fn run_once_exits_after_first_outcome() {
    init_tracing();

    let opts = OrchestratorOptions {
        debounce: Duration::ZERO,
        exit_when_idle: true,
    };
    let mut core = CoreOrchestrator::new(document("X", SANS), opts);
    let step = core.start();
    let generation = match step.commands.as_slice() {
        [CoreCommand::ScheduleDebounce { generation, delay }] => {
            assert_eq!(*delay, Duration::ZERO);
            *generation
        }
        other => panic!("unexpected {other:?}"),
    };

    let step = elapse(&mut core, generation);
    assert!(step.keep_running);
    let (seq, _) = sent_request(&step).unwrap();

    let step = core.step(CoreEvent::CompileFinished {
        seq,
        result: Ok(pdf_response(FAKE_PDF)),
    });
    assert!(!step.keep_running);
    assert_eq!(step.commands.last(), Some(&CoreCommand::RequestExit));
}

#[test]
fn shutdown_stops_the_loop() {
    let mut core = CoreOrchestrator::new(document("X", SANS), options());
    core.start();

    let step = core.step(CoreEvent::ShutdownRequested);
    assert!(!step.keep_running);
    assert_eq!(core.state(), OrchestratorState::Idle);
}

#[test]
fn returning_to_last_compiled_supersedes_request_in_flight() {
    init_tracing();

    let mut core = compiled("X", SANS);

    let g = edit(&mut core, "Y", SANS);
    let (ry, _) = sent_request(&elapse(&mut core, g)).unwrap();
    assert_eq!(core.state(), OrchestratorState::InFlight);

    let g = edit(&mut core, "X", SANS);
    let step = elapse(&mut core, g);
    assert!(sent_request(&step).is_none());
    assert_eq!(step.commands, vec![CoreCommand::SetCompiling(false)]);
    assert_eq!(core.state(), OrchestratorState::Idle);

    // Y no longer matches the document; its response must not replace X.
    let step = core.step(CoreEvent::CompileFinished {
        seq: ry,
        result: Ok(pdf_response(b"%PDF Y")),
    });
    assert!(presented(&step).is_none());
    assert_eq!(core.last_compiled().map(|r| r.text.as_str()), Some("X"));
}

#[test]
fn preview_failure_forgets_the_compiled_snapshot() {
    init_tracing();

    let mut core = compiled("X", SANS);

    let g = edit(&mut core, "Y", SANS);
    let (seq, _) = sent_request(&elapse(&mut core, g)).unwrap();
    core.step(CoreEvent::CompileFinished {
        seq,
        result: Ok(pdf_response(b"%PDF Y")),
    });
    assert_eq!(core.last_compiled().map(|r| r.text.as_str()), Some("Y"));

    // The presenter could not show Y; X is what is on screen.
    let step = core.step(CoreEvent::PreviewFailed);
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert_eq!(core.last_compiled().map(|r| r.text.as_str()), Some("X"));

    // Y is sent again after an edit round trip, X still is not.
    edit(&mut core, "Z", SANS);
    let g = edit(&mut core, "Y", SANS);
    let (_, request) = sent_request(&elapse(&mut core, g)).expect("Y resent");
    assert_eq!(request.text, "Y");
}
