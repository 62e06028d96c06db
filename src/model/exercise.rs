//! Exercise content model
//!
//! Classrooms group exercises; an exercise walks from a before state to an after
//! state through ordered steps. Everything here is read-only once loaded. The serde
//! layout uses camelCase keys to match the JSON content files.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How hard an exercise is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Lowercase label used in listings
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A positioned, identity-bearing element drawn on the exercise canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    /// Unique within any visible set
    pub id: String,
    /// Element tag such as "div" or "button"
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Text shown inside the element
    #[serde(default)]
    pub content: String,
    /// CSS-like style properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, String>>,
}

impl VisualElement {
    /// Create an element at the origin with no size
    pub fn new(id: impl Into<String>, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            content: content.into(),
            style: None,
        }
    }

    /// Set the position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the size
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Add a style property
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.get_or_insert_with(BTreeMap::new).insert(property.into(), value.into());
        self
    }

    /// Look up a style property
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style.as_ref().and_then(|s| s.get(property)).map(String::as_str)
    }
}

/// Advisory annotation shown while its step is current
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub description: String,
}

/// A snapshot of code and canvas elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_elements: Option<Vec<VisualElement>>,
}

impl ExerciseState {
    /// Create a state from optional code and elements
    pub fn new(code: Option<&str>, elements: Option<Vec<VisualElement>>) -> Self {
        Self { code: code.map(str::to_string), visual_elements: elements }
    }

    /// Elements in this state (empty when absent)
    pub fn elements(&self) -> &[VisualElement] {
        self.visual_elements.as_deref().unwrap_or_default()
    }
}

/// One increment of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    /// Animation hint in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Elements introduced or updated once this step is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_elements: Option<Vec<VisualElement>>,
    /// Code that becomes current once this step is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Rationale shown in the explanation panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// Instruction for an interactive step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Fragment the learner's code must contain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_code: Option<String>,
}

impl Step {
    /// Create a step with no increments
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            highlights: Vec::new(),
            duration: None,
            visual_elements: None,
            code: None,
            why: None,
            task: None,
            expected_code: None,
        }
    }

    /// Set the incremental elements
    pub fn with_elements(mut self, elements: Vec<VisualElement>) -> Self {
        self.visual_elements = Some(elements);
        self
    }

    /// Set the code snapshot
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Make the step interactive
    pub fn with_task(mut self, task: impl Into<String>, expected_code: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self.expected_code = Some(expected_code.into());
        self
    }

    /// Set the rationale text
    pub fn with_why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    /// Attach a highlight
    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlights.push(highlight);
        self
    }

    /// Interactive steps carry both a task and an expected fragment
    pub fn is_interactive(&self) -> bool {
        self.task.is_some() && self.expected_code.is_some()
    }
}

/// A single before to after learning unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Language of the code snapshots, used for highlighting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub before_state: ExerciseState,
    #[serde(default)]
    pub after_state: ExerciseState,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Exercise {
    /// Create an empty beginner exercise
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            difficulty: Difficulty::default(),
            language: None,
            before_state: ExerciseState::default(),
            after_state: ExerciseState::default(),
            steps: Vec::new(),
        }
    }

    /// Set the before state
    pub fn with_before(mut self, state: ExerciseState) -> Self {
        self.before_state = state;
        self
    }

    /// Set the after state
    pub fn with_after(mut self, state: ExerciseState) -> Self {
        self.after_state = state;
        self
    }

    /// Append a step
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of steps
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Whether any step asks the learner to write code
    pub fn is_interactive(&self) -> bool {
        self.steps.iter().any(Step::is_interactive)
    }
}

/// A named collection of exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Classroom {
    /// Find an exercise by id
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
    }

    #[test]
    fn element_type_key_maps_to_kind() {
        let json = r##"{"id":"b","type":"button","x":1,"y":2,"width":3,"height":4,
            "content":"Go","style":{"color":"white"}}"##;
        let el: VisualElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.kind, "button");
        assert_eq!(el.style_value("color"), Some("white"));
        assert_eq!(el.style_value("border"), None);
    }

    #[test]
    fn step_reads_camel_case_fields() {
        let json = r#"{"id":"s1","title":"T","task":"Do it","expectedCode":"addEventListener",
            "visualElements":[]}"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert!(step.is_interactive());
        assert!(step.highlights.is_empty());
        assert_eq!(step.visual_elements, Some(vec![]));
    }

    #[test]
    fn step_without_expected_code_is_not_interactive() {
        let step = Step::new("s", "T", "D");
        assert!(!step.is_interactive());

        let mut half = Step::new("s", "T", "D");
        half.task = Some("Only a task".into());
        assert!(!half.is_interactive());
    }

    #[test]
    fn exercise_state_elements_defaults_to_empty() {
        let state = ExerciseState::default();
        assert!(state.elements().is_empty());
    }

    #[test]
    fn element_builder_sets_geometry() {
        let el = VisualElement::new("a", "div", "X").at(10.0, 20.0).sized(30.0, 40.0);
        assert_eq!((el.x, el.y, el.width, el.height), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn classroom_finds_exercise_by_id() {
        let classroom = Classroom {
            id: "c".into(),
            name: "C".into(),
            description: String::new(),
            exercises: vec![Exercise::new("e1", "One"), Exercise::new("e2", "Two")],
        };
        assert_eq!(classroom.exercise("e2").map(|e| e.title.as_str()), Some("Two"));
        assert!(classroom.exercise("e3").is_none());
    }
}
