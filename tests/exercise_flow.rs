use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use dojo::engine::{SubmitOutcome, TransitionOutcome, ValidationState, resolve_elements, resolve_preview};
use dojo::model::{Exercise, ExerciseState, Step, VisualElement};
use dojo::{Catalog, ExerciseSession, Timing};
use pretty_assertions::assert_eq;

fn el(id: &str, content: &str) -> VisualElement {
    VisualElement::new(id, "div", content).at(10.0, 10.0).sized(100.0, 40.0)
}

fn three_steps() -> Exercise {
    Exercise::new("card", "Build a Card")
        .with_before(ExerciseState::new(Some("<div></div>"), Some(vec![el("card", "")])))
        .with_after(ExerciseState::new(
            Some("<div><h1>Hi</h1><p>Body</p></div>"),
            Some(vec![el("card", "Card"), el("title", "Hi"), el("body", "Body")]),
        ))
        .with_step(Step::new("title", "Add a title", "").with_elements(vec![el("title", "Hi")]))
        .with_step(
            Step::new("body", "Add a body", "")
                .with_code("<div><h1>Hi</h1><p>Body</p></div>")
                .with_elements(vec![el("body", "Body")]),
        )
        .with_step(Step::new("label", "Label the card", "").with_elements(vec![
            el("card", "Card"),
            el("title", "Hi"),
            el("body", "Body"),
        ]))
}

/// Request a move and wait out the transition
fn step(session: &mut ExerciseSession, now: Instant, forward: bool) -> Instant {
    let outcome = if forward { session.advance(now) } else { session.retreat(now) };
    assert!(outcome.is_scheduled(), "unexpected {outcome:?}");
    let later = now + Timing::default().transition_delay;
    assert!(session.tick(later));
    later
}

#[test]
fn three_step_exercise_reaches_goal() {
    let exercise = Arc::new(three_steps());
    let mut session = ExerciseSession::new(exercise.clone(), Timing::default());
    let mut now = Instant::now();

    assert_eq!(session.view().elements, vec![el("card", "")]);

    for _ in 0..3 {
        now = step(&mut session, now, true);
    }

    assert!(session.is_complete());
    assert_eq!(session.view().elements, exercise.after_state.elements());
    assert_eq!(session.advance(now), TransitionOutcome::OutOfRange);
}

#[test]
fn final_preview_matches_realized_state() {
    let exercise = three_steps();
    let last = exercise.total_steps() - 1;
    assert_eq!(resolve_preview(&exercise, last).elements, resolve_elements(&exercise, last + 1));
    assert_eq!(resolve_elements(&exercise, 0), exercise.before_state.elements());
}

#[test]
fn reset_from_anywhere_restores_the_opening_view() {
    let exercise = Arc::new(three_steps());
    let mut session = ExerciseSession::new(exercise, Timing::default());
    let opening = session.view().clone();

    let now = step(&mut session, Instant::now(), true);
    let now = step(&mut session, now, true);
    assert!(session.advance(now).is_scheduled());

    session.reset();
    assert_eq!(session.view(), &opening);

    // The transition abandoned by the reset never lands
    assert!(!session.tick(now + Timing::default().transition_delay * 2));
    assert_eq!(session.current_step_index(), 0);
    assert_eq!(session.editor_code(), "<div></div>");

    session.reset();
    assert_eq!(session.view(), &opening);
    assert!(!session.is_animating());
}

#[test]
fn content_file_drives_an_interactive_session() {
    let json = r#"{"classrooms":[{"id":"js","name":"JS","exercises":[{
        "id":"log","title":"Log it","language":"javascript",
        "beforeState":{"code":"const x = 1;"},
        "steps":[
            {"id":"print","title":"Print x","task":"Log x to the console","expectedCode":"console.log(x)"},
            {"id":"done","title":"Done","code":"const x = 1;\nconsole.log(x);"}
        ]}]}]}"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let catalog = Catalog::load(file.path()).unwrap();
    let exercise = Arc::new(catalog.exercise("js", "log").unwrap().clone());
    let mut session = ExerciseSession::new(exercise, Timing::default());
    let now = Instant::now();

    assert_eq!(session.advance(now), TransitionOutcome::Blocked);

    session.edit("const x = 1;\nConsole.Log(x);");
    let SubmitOutcome::Correct(ticket) = session.submit(now) else {
        panic!("case-insensitive answer should be accepted");
    };
    assert_eq!(session.validation(), ValidationState::Correct);

    assert!(session.tick(ticket.due()));
    assert!(session.tick(ticket.due() + Timing::default().transition_delay));
    assert_eq!(session.current_step_index(), 1);
    assert_eq!(session.validation(), ValidationState::Idle);
}
