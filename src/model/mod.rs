//! Classroom and exercise content

pub mod catalog;
pub mod exercise;

pub use catalog::Catalog;
pub use exercise::{Classroom, Difficulty, Exercise, ExerciseState, Highlight, Step, VisualElement};
