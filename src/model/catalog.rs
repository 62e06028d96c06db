//! Classroom catalog: id-based lookup and content loading

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::exercise::{Classroom, Exercise, VisualElement};
use crate::error::DojoError;

/// Built-in sample classrooms
const BUILTIN_CONTENT: &str = include_str!("../../content/classrooms.json");

/// All classrooms available to the viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub classrooms: Vec<Classroom>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness
    pub fn new(classrooms: Vec<Classroom>) -> Result<Self, DojoError> {
        let catalog = Self { classrooms };
        catalog.check()?;
        Ok(catalog)
    }

    /// The sample content shipped with the binary
    pub fn builtin() -> Result<Self, DojoError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Parse a catalog from JSON (either `{"classrooms": [...]}` or a bare array)
    pub fn from_json(json: &str) -> Result<Self, DojoError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Wrapped { classrooms: Vec<Classroom> },
            Bare(Vec<Classroom>),
        }

        let classrooms = match serde_json::from_str::<Document>(json) {
            Ok(Document::Wrapped { classrooms }) | Ok(Document::Bare(classrooms)) => classrooms,
            // Untagged errors are vague, so re-parse for the real message
            Err(_) => serde_json::from_str::<Catalog>(json)?.classrooms,
        };
        Self::new(classrooms)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, DojoError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded {} classrooms from {}",
            catalog.classrooms.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Look up a classroom by id
    pub fn classroom(&self, id: &str) -> Result<&Classroom, DojoError> {
        self.classrooms
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DojoError::ClassroomNotFound(id.to_string()))
    }

    /// Look up an exercise by classroom and exercise id
    pub fn exercise(&self, classroom_id: &str, exercise_id: &str) -> Result<&Exercise, DojoError> {
        self.classroom(classroom_id)?.exercise(exercise_id).ok_or_else(|| {
            DojoError::ExerciseNotFound {
                classroom: classroom_id.to_string(),
                exercise: exercise_id.to_string(),
            }
        })
    }

    /// Total number of exercises across classrooms
    pub fn exercise_count(&self) -> usize {
        self.classrooms.iter().map(|c| c.exercises.len()).sum()
    }

    /// Verify id uniqueness at every level
    fn check(&self) -> Result<(), DojoError> {
        unique(self.classrooms.iter().map(|c| c.id.as_str()), "classroom id")?;

        for classroom in &self.classrooms {
            unique(
                classroom.exercises.iter().map(|e| e.id.as_str()),
                &format!("exercise id in classroom '{}'", classroom.id),
            )?;

            for exercise in &classroom.exercises {
                let scope = format!("{}/{}", classroom.id, exercise.id);
                unique(exercise.steps.iter().map(|s| s.id.as_str()), &format!("step id in {scope}"))?;
                unique_elements(exercise.before_state.elements(), &format!("{scope} before state"))?;
                unique_elements(exercise.after_state.elements(), &format!("{scope} after state"))?;
                for step in &exercise.steps {
                    if let Some(elements) = &step.visual_elements {
                        unique_elements(elements, &format!("{scope} step '{}'", step.id))?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a str>, what: &str) -> Result<(), DojoError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DojoError::InvalidContent(format!("duplicate {what}: '{id}'")));
        }
    }
    Ok(())
}

fn unique_elements(elements: &[VisualElement], scope: &str) -> Result<(), DojoError> {
    unique(elements.iter().map(|e| e.id.as_str()), &format!("element id in {scope}"))
}
