//! Step progression and state derivation
//!
//! [`StepNavigator`] owns the step index, [`resolver`] derives the visible state
//! for an index, [`validator`] decides whether learner code completes a step, and
//! [`ExerciseSession`] ties them together for one open exercise.

pub mod elements;
pub mod navigator;
pub mod resolver;
pub mod session;
pub mod validator;

use std::time::Duration;

pub use elements::ElementSet;
pub use navigator::{Direction, StepChange, StepNavigator, TransitionOutcome, TransitionTicket};
pub use resolver::{Preview, code_as_of_step, resolve_code, resolve_elements, resolve_preview};
pub use session::{AutoAdvanceTicket, ExerciseSession, ExerciseView, SubmitOutcome};
pub use validator::{ValidationState, validate, validate_step};

/// Delays used by step transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay between requesting a move and the index changing
    pub transition_delay: Duration,
    /// Delay between a correct submission and the automatic advance
    pub auto_advance_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            transition_delay: Duration::from_millis(500),
            auto_advance_delay: Duration::from_millis(800),
        }
    }
}
