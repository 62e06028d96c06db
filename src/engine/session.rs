//! One open exercise: navigator, editor and validation under a single owner
//!
//! The session recomputes its [`ExerciseView`] whenever anything it derives from
//! changes. Delayed work (the pending step transition and the auto-advance after a
//! correct answer) is driven by [`ExerciseSession::tick`] with an explicit clock,
//! and guarded by epochs so callbacks from abandoned work are dropped.

use std::sync::Arc;
use std::time::Instant;

use super::Timing;
use super::navigator::{Direction, StepChange, StepNavigator, TransitionOutcome};
use super::resolver::{Preview, code_as_of_step, resolve_code, resolve_elements, resolve_preview};
use super::validator::{ValidationState, validate_step};
use crate::model::{Exercise, Highlight, Step, VisualElement};

/// Everything a renderer needs to draw the exercise at the current index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseView {
    pub step_index: usize,
    pub total_steps: usize,
    /// Cumulative canvas elements
    pub elements: Vec<VisualElement>,
    /// Highlights of the current step, empty while animating or complete
    pub highlights: Vec<Highlight>,
    /// Cumulative code
    pub code: Option<String>,
    /// State once the current step is completed
    pub preview: Preview,
    pub is_animating: bool,
    pub is_complete: bool,
    /// Learner code in the editor
    pub editor_code: String,
    pub validation: ValidationState,
    /// Expected fragment, present only after an incorrect submission
    pub hint: Option<String>,
    pub why_expanded: bool,
}

impl ExerciseView {
    fn derive(session: &ExerciseSession) -> Self {
        let exercise = session.exercise.as_ref();
        let navigator = &session.navigator;
        let step_index = navigator.current();
        let is_animating = navigator.is_animating();
        let is_complete = navigator.is_complete();

        let highlights = match exercise.steps.get(step_index) {
            Some(step) if !is_animating => step.highlights.clone(),
            _ => Vec::new(),
        };

        Self {
            step_index,
            total_steps: navigator.total_steps(),
            elements: resolve_elements(exercise, step_index),
            highlights,
            code: resolve_code(exercise, step_index).map(str::to_string),
            preview: resolve_preview(exercise, step_index),
            is_animating,
            is_complete,
            editor_code: session.editor_code.clone(),
            validation: session.validation,
            hint: session.hint().map(str::to_string),
            why_expanded: session.why_expanded,
        }
    }

    /// Percentage shown next to "Step N of M", capped at 100
    pub fn progress_percent(&self) -> u8 {
        if self.total_steps == 0 {
            return 100;
        }
        let percent = (self.step_index + 1) as f64 / self.total_steps as f64 * 100.0;
        percent.round().min(100.0) as u8
    }
}

/// Handle for the delayed advance that follows a correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvanceTicket {
    epoch: u64,
    due: Instant,
}

impl AutoAdvanceTicket {
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// Result of submitting the editor contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; the session advances once the ticket is due
    Correct(AutoAdvanceTicket),
    /// Rejected; the hint is the fragment the code must contain
    Incorrect { hint: String },
    /// Nothing to check right now
    Ignored,
}

/// State of one exercise view
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercise: Arc<Exercise>,
    navigator: StepNavigator,
    timing: Timing,
    editor_code: String,
    validation: ValidationState,
    why_expanded: bool,
    epoch: u64,
    auto_advance: Option<AutoAdvanceTicket>,
    view: ExerciseView,
}

impl ExerciseSession {
    /// Open an exercise at step 0
    pub fn new(exercise: Arc<Exercise>, timing: Timing) -> Self {
        let navigator = StepNavigator::new(exercise.total_steps(), timing.transition_delay);
        let editor_code = code_as_of_step(&exercise, 0).to_string();
        tracing::info!("Opened exercise '{}' ({} steps)", exercise.id, exercise.total_steps());

        let mut session = Self {
            exercise,
            navigator,
            timing,
            editor_code,
            validation: ValidationState::Idle,
            why_expanded: false,
            epoch: 0,
            auto_advance: None,
            view: ExerciseView::default(),
        };
        session.refresh();
        session
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn view(&self) -> &ExerciseView {
        &self.view
    }

    pub fn current_step_index(&self) -> usize {
        self.navigator.current()
    }

    /// The step being worked on, `None` once complete
    pub fn current_step(&self) -> Option<&Step> {
        self.exercise.steps.get(self.navigator.current())
    }

    pub fn is_complete(&self) -> bool {
        self.navigator.is_complete()
    }

    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    pub fn editor_code(&self) -> &str {
        &self.editor_code
    }

    pub fn validation(&self) -> ValidationState {
        self.validation
    }

    pub fn why_expanded(&self) -> bool {
        self.why_expanded
    }

    pub fn pending_auto_advance(&self) -> Option<AutoAdvanceTicket> {
        self.auto_advance
    }

    /// The expected fragment, shown after an incorrect submission
    pub fn hint(&self) -> Option<&str> {
        if self.validation != ValidationState::Incorrect {
            return None;
        }
        self.current_step().and_then(|step| step.expected_code.as_deref())
    }

    /// Whether advancing is currently allowed by validation
    pub fn can_advance(&self) -> bool {
        !self.is_complete()
            && self
                .current_step()
                .is_none_or(|step| !step.is_interactive() || self.validation == ValidationState::Correct)
    }

    /// Request the next step
    ///
    /// Interactive steps must be answered correctly first; otherwise the request
    /// is reported as [`TransitionOutcome::Blocked`].
    pub fn advance(&mut self, now: Instant) -> TransitionOutcome {
        if let Some(step) = self.current_step() {
            if step.is_interactive() && self.validation != ValidationState::Correct {
                tracing::warn!("Advance blocked: step '{}' needs a correct answer", step.id);
                return TransitionOutcome::Blocked;
            }
        }
        let outcome = self.navigator.advance(now);
        self.after_request(outcome)
    }

    /// Request the previous step
    pub fn retreat(&mut self, now: Instant) -> TransitionOutcome {
        let outcome = self.navigator.retreat(now);
        self.after_request(outcome)
    }

    fn after_request(&mut self, outcome: TransitionOutcome) -> TransitionOutcome {
        if outcome.is_scheduled() {
            self.cancel_auto_advance();
            self.refresh();
        }
        outcome
    }

    /// Back to step 0 with a fresh editor, immediately
    pub fn reset(&mut self) {
        self.navigator.reset();
        self.editor_code = code_as_of_step(&self.exercise, 0).to_string();
        self.validation = ValidationState::Idle;
        self.why_expanded = false;
        self.cancel_auto_advance();
        self.refresh();
        tracing::info!("Reset exercise '{}'", self.exercise.id);
    }

    /// Replace the editor contents
    ///
    /// Any validation result is cleared, which also abandons a pending
    /// auto-advance.
    pub fn edit(&mut self, code: impl Into<String>) {
        self.editor_code = code.into();
        if self.validation != ValidationState::Idle {
            self.validation = ValidationState::Idle;
            self.cancel_auto_advance();
        }
        self.refresh();
    }

    /// Check the editor contents against the current step
    pub fn submit(&mut self, now: Instant) -> SubmitOutcome {
        if self.validation == ValidationState::Correct || self.navigator.is_animating() {
            return SubmitOutcome::Ignored;
        }

        let (passed, expected) = match self.current_step() {
            Some(step) => (validate_step(step, &self.editor_code), step.expected_code.clone()),
            None => return SubmitOutcome::Ignored,
        };

        if passed {
            self.validation = ValidationState::Correct;
            let ticket =
                AutoAdvanceTicket { epoch: self.epoch, due: now + self.timing.auto_advance_delay };
            self.auto_advance = Some(ticket);
            tracing::info!("Step {} answered correctly", self.navigator.current() + 1);
            self.refresh();
            SubmitOutcome::Correct(ticket)
        } else {
            self.validation = ValidationState::Incorrect;
            tracing::debug!("Step {} answer rejected", self.navigator.current() + 1);
            self.refresh();
            SubmitOutcome::Incorrect { hint: expected.unwrap_or_default() }
        }
    }

    /// Show or hide the explanation panel
    pub fn toggle_why(&mut self) -> bool {
        self.why_expanded = !self.why_expanded;
        self.refresh();
        self.why_expanded
    }

    /// Run the auto-advance for a ticket; stale tickets return `None`
    pub fn fire_auto_advance(&mut self, ticket: AutoAdvanceTicket) -> Option<TransitionOutcome> {
        if ticket.epoch != self.epoch || self.auto_advance != Some(ticket) {
            tracing::debug!("Dropping stale auto-advance (epoch {})", ticket.epoch);
            return None;
        }

        self.auto_advance = None;
        let outcome = self.advance(ticket.due);
        self.validation = ValidationState::Idle;
        self.refresh();
        Some(outcome)
    }

    /// Run whatever delayed work is due; returns whether anything changed
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(ticket) = self.auto_advance.filter(|t| now >= t.due) {
            changed |= self.fire_auto_advance(ticket).is_some();
        }

        if let Some(change) = self.navigator.tick(now) {
            self.apply_change(change);
            changed = true;
        }

        changed
    }

    fn apply_change(&mut self, change: StepChange) {
        self.validation = ValidationState::Idle;
        self.why_expanded = false;
        self.cancel_auto_advance();
        self.editor_code = match change.direction {
            Direction::Forward => {
                resolve_code(&self.exercise, change.to).unwrap_or_default().to_string()
            }
            Direction::Backward => code_as_of_step(&self.exercise, change.to).to_string(),
        };
        self.refresh();
        tracing::debug!("Step {} -> {} in '{}'", change.from, change.to, self.exercise.id);
    }

    fn cancel_auto_advance(&mut self) {
        self.auto_advance = None;
        self.epoch += 1;
    }

    fn refresh(&mut self) {
        self.view = ExerciseView::derive(self);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ExerciseState, Highlight};

    fn highlight(id: &str) -> Highlight {
        Highlight {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            description: id.into(),
        }
    }

    fn walkthrough() -> Arc<Exercise> {
        Arc::new(
            Exercise::new("walk", "Walkthrough")
                .with_before(ExerciseState::new(Some("v0"), None))
                .with_step(Step::new("s0", "Zero", "").with_highlight(highlight("h0")))
                .with_step(Step::new("s1", "One", "").with_code("v1"))
                .with_step(Step::new("s2", "Two", "")),
        )
    }

    fn interactive() -> Arc<Exercise> {
        Arc::new(
            Exercise::new("quiz", "Quiz")
                .with_before(ExerciseState::new(Some("let count = 0;"), None))
                .with_step(
                    Step::new("inc", "Increment", "")
                        .with_task("Increment count", "count++")
                        .with_code("let count = 0;\ncount++;"),
                )
                .with_step(Step::new("done", "Done", "")),
        )
    }

    fn finish_transition(session: &mut ExerciseSession, now: Instant) -> Instant {
        let later = now + Timing::default().transition_delay;
        assert!(session.tick(later));
        later
    }

    #[test]
    fn opens_at_step_zero_with_before_code() {
        let session = ExerciseSession::new(walkthrough(), Timing::default());
        assert_eq!(session.current_step_index(), 0);
        assert_eq!(session.editor_code(), "v0");
        assert_eq!(session.view().code.as_deref(), Some("v0"));
        assert_eq!(session.view().highlights.len(), 1);
    }

    #[test]
    fn highlights_hidden_while_animating() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        session.advance(now);
        assert!(session.view().is_animating);
        assert!(session.view().highlights.is_empty());
    }

    #[test]
    fn three_advances_reach_completion() {
        let mut now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        for _ in 0..3 {
            assert!(session.advance(now).is_scheduled());
            now = finish_transition(&mut session, now);
        }
        assert!(session.is_complete());
        assert!(session.view().is_complete);
        assert_eq!(session.view().code.as_deref(), Some("v1"));
        assert_eq!(session.advance(now), TransitionOutcome::OutOfRange);
    }

    #[test]
    fn retreat_reseeds_editor_from_history() {
        let mut now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        for _ in 0..2 {
            session.advance(now);
            now = finish_transition(&mut session, now);
        }
        assert_eq!(session.editor_code(), "v1");

        session.retreat(now);
        finish_transition(&mut session, now);
        assert_eq!(session.current_step_index(), 1);
        assert_eq!(session.editor_code(), "v0");
    }

    #[test]
    fn interactive_step_blocks_until_correct() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(interactive(), Timing::default());
        assert!(!session.can_advance());
        assert_eq!(session.advance(now), TransitionOutcome::Blocked);
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn wrong_answer_is_incorrect_with_hint() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(interactive(), Timing::default());
        session.edit("count += 1");

        let outcome = session.submit(now);
        assert_eq!(outcome, SubmitOutcome::Incorrect { hint: "count++".into() });
        assert_eq!(session.validation(), ValidationState::Incorrect);
        assert_eq!(session.hint(), Some("count++"));

        session.edit("count++");
        assert_eq!(session.validation(), ValidationState::Idle);
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn correct_answer_auto_advances() {
        let now = Instant::now();
        let timing = Timing::default();
        let mut session = ExerciseSession::new(interactive(), timing);
        session.edit("let count = 0;\n  COUNT++;");

        let SubmitOutcome::Correct(ticket) = session.submit(now) else {
            panic!("expected a correct submission");
        };
        assert_eq!(ticket.due(), now + timing.auto_advance_delay);
        assert_eq!(session.submit(now), SubmitOutcome::Ignored);

        assert!(!session.tick(now + Duration::from_millis(799)));
        assert!(session.tick(ticket.due()));
        assert!(session.is_animating());
        assert_eq!(session.validation(), ValidationState::Idle);

        assert!(session.tick(ticket.due() + timing.transition_delay));
        assert_eq!(session.current_step_index(), 1);
        assert_eq!(session.editor_code(), "let count = 0;\ncount++;");
    }

    #[test]
    fn reset_drops_pending_auto_advance() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(interactive(), Timing::default());
        session.edit("count++");
        let SubmitOutcome::Correct(ticket) = session.submit(now) else {
            panic!("expected a correct submission");
        };

        session.reset();
        assert_eq!(session.fire_auto_advance(ticket), None);
        assert!(!session.tick(now + Duration::from_secs(5)));
        assert_eq!(session.current_step_index(), 0);
        assert_eq!(session.editor_code(), "let count = 0;");
    }

    #[test]
    fn editing_after_correct_abandons_auto_advance() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(interactive(), Timing::default());
        session.edit("count++");
        let SubmitOutcome::Correct(ticket) = session.submit(now) else {
            panic!("expected a correct submission");
        };

        session.edit("count");
        assert_eq!(session.validation(), ValidationState::Idle);
        assert_eq!(session.fire_auto_advance(ticket), None);
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn reset_restores_initial_state_idempotently() {
        let mut now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        session.advance(now);
        now = finish_transition(&mut session, now);
        session.advance(now);
        session.toggle_why();

        session.reset();
        let once = (
            session.current_step_index(),
            session.editor_code().to_string(),
            session.validation(),
            session.why_expanded(),
            session.view().clone(),
        );
        session.reset();
        let twice = (
            session.current_step_index(),
            session.editor_code().to_string(),
            session.validation(),
            session.why_expanded(),
            session.view().clone(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.0, 0);
        assert!(!once.3);
    }

    #[test]
    fn submit_when_complete_is_ignored() {
        let session_exercise = Arc::new(Exercise::new("empty", "Empty"));
        let mut session = ExerciseSession::new(session_exercise, Timing::default());
        assert!(session.is_complete());
        assert_eq!(session.submit(Instant::now()), SubmitOutcome::Ignored);
    }

    #[test]
    fn progress_percent_rounds_and_caps() {
        let mut now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        assert_eq!(session.view().progress_percent(), 33);
        for _ in 0..3 {
            session.advance(now);
            now = finish_transition(&mut session, now);
        }
        assert_eq!(session.view().progress_percent(), 100);

        let empty = ExerciseSession::new(Arc::new(Exercise::new("e", "E")), Timing::default());
        assert_eq!(empty.view().progress_percent(), 100);
    }

    #[test]
    fn reset_with_transition_pending_stays_at_zero() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        assert!(session.advance(now).is_scheduled());

        session.reset();
        assert!(!session.tick(now + Timing::default().transition_delay * 4));
        assert_eq!(session.current_step_index(), 0);
        assert!(!session.is_animating());
        assert_eq!(session.view().highlights.len(), 1);
    }

    #[test]
    fn changing_step_collapses_why() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(walkthrough(), Timing::default());
        assert!(session.toggle_why());
        assert!(session.view().why_expanded);

        session.advance(now);
        finish_transition(&mut session, now);
        assert!(!session.why_expanded());
        assert!(!session.view().why_expanded);
    }

    #[test]
    fn view_follows_editor_and_validation() {
        let now = Instant::now();
        let mut session = ExerciseSession::new(interactive(), Timing::default());
        assert_eq!(session.view().editor_code, "let count = 0;");
        assert_eq!(session.view().validation, ValidationState::Idle);

        session.edit("count--");
        assert_eq!(session.view().editor_code, "count--");

        session.submit(now);
        assert_eq!(session.view().validation, ValidationState::Incorrect);
        assert_eq!(session.view().hint.as_deref(), Some("count++"));

        session.edit("count++");
        assert_eq!(session.view().hint, None);
        session.submit(now);
        assert_eq!(session.view().validation, ValidationState::Correct);
    }

    fn builtin(classroom: &str, exercise: &str) -> Arc<Exercise> {
        let catalog = crate::model::Catalog::builtin().unwrap();
        Arc::new(catalog.exercise(classroom, exercise).unwrap().clone())
    }

    /// Submit a correct answer and let the auto-advance and transition run
    fn answer(session: &mut ExerciseSession, code: &str, now: Instant) -> Instant {
        session.edit(code);
        let SubmitOutcome::Correct(ticket) = session.submit(now) else {
            panic!("expected {:?} to be accepted", code);
        };
        assert!(session.tick(ticket.due()));
        finish_transition(session, ticket.due())
    }

    #[test]
    fn click_counter_walkthrough() {
        let exercise = builtin("hands-on-javascript", "click-counter");
        let mut session = ExerciseSession::new(exercise.clone(), Timing::default());
        let mut now = Instant::now();

        // Reading step needs no answer
        assert!(session.advance(now).is_scheduled());
        now = finish_transition(&mut session, now);
        assert_eq!(session.editor_code(), exercise.before_state.code.as_deref().unwrap());

        assert_eq!(session.advance(now), TransitionOutcome::Blocked);
        assert_eq!(
            session.submit(now),
            SubmitOutcome::Incorrect { hint: "addEventListener(\"click\"".into() }
        );

        let listen = format!("{}\nbutton.addEventListener(\"click\", () => {{}});", session.editor_code());
        now = answer(&mut session, &listen, now);
        assert_eq!(session.current_step().map(|s| s.id.as_str()), Some("increment"));
        assert_eq!(Some(session.editor_code()), exercise.steps[1].code.as_deref());

        let increment = session.editor_code().replace("{\n});", "{\n  count++;\n});");
        now = answer(&mut session, &increment, now);

        let render = format!("{}\nbutton.textContent = count;", session.editor_code());
        answer(&mut session, &render, now);

        assert!(session.is_complete());
        assert_eq!(session.view().elements, exercise.after_state.elements());
        assert_eq!(session.view().progress_percent(), 100);
    }

    #[test]
    fn preview_matches_next_realized_state() {
        let catalog = crate::model::Catalog::builtin().unwrap();
        for classroom in &catalog.classrooms {
            for exercise in &classroom.exercises {
                for (k, step) in exercise.steps.iter().enumerate() {
                    if step.visual_elements.is_some() {
                        continue;
                    }
                    let preview = resolve_preview(exercise, k);
                    assert_eq!(preview.elements, resolve_elements(exercise, k + 1), "{} step {}", exercise.id, k);
                    assert_eq!(
                        preview.code.as_deref(),
                        resolve_code(exercise, k + 1),
                        "{} step {}",
                        exercise.id,
                        k
                    );
                }
            }
        }
    }

    #[test]
    fn creating_a_button_ends_at_goal() {
        let exercise = builtin("web-fundamentals", "creating-a-button");
        let mut session = ExerciseSession::new(exercise.clone(), Timing::default());
        let mut now = Instant::now();
        while !session.is_complete() {
            assert!(session.advance(now).is_scheduled());
            now = finish_transition(&mut session, now);
        }
        assert_eq!(session.view().elements, exercise.after_state.elements());
        assert_eq!(session.view().code, exercise.after_state.code);
        assert_eq!(session.view().preview.elements, exercise.after_state.elements());
    }
}
