//! Lenient textual check of learner code against an expected fragment

use crate::model::Step;

/// Outcome of the last submission on the current step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationState {
    #[default]
    Idle,
    Correct,
    Incorrect,
}

/// Trim surrounding whitespace and lowercase
pub fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Whether the normalized user code contains the normalized expected fragment
pub fn validate(user_code: &str, expected_code: &str) -> bool {
    normalize(user_code).contains(&normalize(expected_code))
}

/// Validate against a step; steps without an expected fragment always pass
pub fn validate_step(step: &Step, user_code: &str) -> bool {
    step.expected_code.as_deref().is_none_or(|expected| validate(user_code, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_ignores_case_and_padding() {
        assert!(validate("  Button.addEventListener('click', fn)  ", "addEventListener"));
        assert!(validate("BUTTON.TEXTCONTENT = x", "  button.textContent "));
    }

    #[test]
    fn missing_fragment_fails() {
        assert!(!validate("nothing here", "addEventListener"));
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert!(!validate("count ++", "count++"));
    }

    #[test]
    fn empty_expected_always_matches() {
        assert!(validate("", ""));
        assert!(validate("anything", "   "));
    }

    #[test]
    fn non_interactive_step_validates() {
        let step = Step::new("s", "T", "D");
        assert!(validate_step(&step, ""));
    }

    #[test]
    fn interactive_step_uses_expected_code() {
        let step = Step::new("s", "T", "D").with_task("Increment", "count++");
        assert!(validate_step(&step, "count++;"));
        assert!(!validate_step(&step, "count += 1;"));
    }
}
