//! Theming system for Dojo

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Canvas
    pub canvas_bg: Color,
    pub element_border: Color,
    pub highlight: Color,

    // Code
    pub code_fg: Color,
    pub code_comment: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Theme {
    /// Badge color for an exercise difficulty
    pub fn difficulty_color(&self, difficulty: Difficulty) -> Color {
        match difficulty {
            Difficulty::Beginner => self.success,
            Difficulty::Intermediate => self.warning,
            Difficulty::Advanced => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}
