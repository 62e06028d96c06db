//! UI rendering components

pub mod canvas;
pub mod classroom;
pub mod classrooms;
pub mod editor;
pub mod exercise;
pub mod layout;
pub mod status_line;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
};

use crate::app::state::{AppState, Route};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    match &state.route {
        Route::Classrooms => {
            classrooms::draw(frame, main_area, &state.catalog, state.classroom_selected, theme);
        }
        Route::Classroom(id) => match state.catalog.classroom(id) {
            Ok(classroom) => {
                classroom::draw(frame, main_area, classroom, state.exercise_selected, theme)
            }
            Err(e) => layout::draw_message(frame, main_area, &e.to_string(), theme),
        },
        Route::Exercise { .. } => match &state.session {
            Some(session) => exercise::draw(frame, main_area, session, &state.editor, theme),
            None => layout::draw_message(frame, main_area, "Exercise not loaded", theme),
        },
    }

    status_line::draw(frame, status_area, state, theme);
}
