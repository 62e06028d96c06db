//! Derives what an exercise looks like at a given step index
//!
//! Step `i` counts as completed once the index is greater than `i`. All functions
//! here are pure; indices past the last step are clamped.

use super::elements::ElementSet;
use crate::model::{Exercise, VisualElement};

/// What the exercise will look like once the current step is completed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
    pub elements: Vec<VisualElement>,
    pub code: Option<String>,
}

/// Before-state elements merged by id with every completed step's increments
pub fn resolve_elements(exercise: &Exercise, step_index: usize) -> Vec<VisualElement> {
    merged_through(exercise, step_index).into_vec()
}

/// Code after `step_index` completed steps
///
/// The latest completed step that defines code wins; without one the before
/// code stays.
pub fn resolve_code(exercise: &Exercise, step_index: usize) -> Option<&str> {
    exercise
        .steps
        .iter()
        .take(step_index)
        .rev()
        .find_map(|step| step.code.as_deref())
        .or(exercise.before_state.code.as_deref())
}

/// Editor contents appropriate for arriving at step `step_index`
///
/// Walks forward from the before code, each defined step code overwriting the
/// running value. Empty when nothing defines code.
pub fn code_as_of_step(exercise: &Exercise, step_index: usize) -> &str {
    let mut code = exercise.before_state.code.as_deref().unwrap_or_default();
    for step in exercise.steps.iter().take(step_index) {
        if let Some(step_code) = step.code.as_deref() {
            code = step_code;
        }
    }
    code
}

/// Preview of the state after completing the step at `step_index`
pub fn resolve_preview(exercise: &Exercise, step_index: usize) -> Preview {
    let Some(step) = exercise.steps.get(step_index) else {
        return Preview {
            elements: exercise.after_state.elements().to_vec(),
            code: exercise.after_state.code.clone(),
        };
    };

    match &step.visual_elements {
        Some(elements) => Preview { elements: elements.clone(), code: step.code.clone() },
        None => Preview {
            elements: resolve_elements(exercise, step_index + 1),
            code: resolve_code(exercise, step_index + 1).map(str::to_string),
        },
    }
}

fn merged_through(exercise: &Exercise, end: usize) -> ElementSet {
    let mut set = ElementSet::from_elements(exercise.before_state.elements());
    for step in exercise.steps.iter().take(end) {
        if let Some(elements) = &step.visual_elements {
            set.merge(elements);
        }
    }
    set
}
