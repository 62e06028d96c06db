//! Status line at the bottom of the screen

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{AppState, Route};
use crate::theme::Theme;

/// Draw the last status message, or key hints for the current screen
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (text, style) = match &state.status.message {
        Some(msg) if state.status.is_error => (msg.clone(), Style::default().fg(theme.error)),
        Some(msg) => (msg.clone(), Style::default().fg(theme.info)),
        None => (hint_for(state).to_string(), Style::default().fg(theme.fg_muted)),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
        .style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(paragraph, area);
}

/// Key hints for the current screen
fn hint_for(state: &AppState) -> &'static str {
    if state.editor.active {
        return "Ctrl-s check · Esc stop editing";
    }
    match state.route {
        Route::Classrooms => "↑/↓ select · Enter open · q quit",
        Route::Classroom(_) => "↑/↓ select · Enter open · Esc back · q quit",
        Route::Exercise { .. } => "←/→ step · r reset · w why · e edit · Esc back · q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Timing;
    use crate::model::Catalog;

    fn state() -> AppState {
        AppState::new(Catalog::builtin().unwrap(), Timing::default())
    }

    #[test]
    fn hints_follow_route() {
        let mut state = state();
        assert!(hint_for(&state).contains("Enter open"));

        state.route = Route::Exercise { classroom: "c".into(), exercise: "e".into() };
        assert!(hint_for(&state).contains("r reset"));
    }

    #[test]
    fn editor_hint_takes_priority() {
        let mut state = state();
        state.editor.open("x");
        assert!(hint_for(&state).starts_with("Ctrl-s"));
    }
}
