//! Dojo - a terminal viewer for step-by-step coding exercises
//!
//! Classrooms hold exercises; each exercise walks from a before state to an
//! after state through ordered steps, some of which ask the learner to write
//! the code themselves.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod syntax;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use engine::{ExerciseSession, Timing};
pub use error::DojoError;
pub use model::Catalog;
pub use theme::Theme;
