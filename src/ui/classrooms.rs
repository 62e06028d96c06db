//! Classroom list screen

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::model::Catalog;
use crate::theme::Theme;
use crate::ui::layout::{draw_message, panel};

/// Rows drawn per classroom: name, description, spacer
const ROWS_PER_ENTRY: usize = 3;

/// Draw every classroom with the selected one highlighted
pub fn draw(frame: &mut Frame, area: Rect, catalog: &Catalog, selected: usize, theme: &Theme) {
    if catalog.classrooms.is_empty() {
        draw_message(frame, area, "No classrooms loaded", theme);
        return;
    }

    let block = panel(" Classrooms ", true, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, classroom) in catalog.classrooms.iter().enumerate() {
        let is_selected = i == selected;
        let marker = if is_selected { "▶ " } else { "  " };

        let name_style = if is_selected {
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD)
        };

        let count = classroom.exercises.len();
        let noun = if count == 1 { "exercise" } else { "exercises" };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", classroom.name), name_style),
            Span::styled(format!("  {count} {noun}"), Style::default().fg(theme.fg_muted)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", classroom.description),
            Style::default().fg(theme.fg_secondary),
        )));
        lines.push(Line::default());
    }

    let scroll = scroll_for(selected, ROWS_PER_ENTRY, usize::from(inner.height));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

/// First visible row so that entry `selected` stays on screen
pub fn scroll_for(selected: usize, rows_per_entry: usize, visible: usize) -> u16 {
    let last_row = (selected + 1) * rows_per_entry;
    last_row.saturating_sub(visible).min(usize::from(u16::MAX)) as u16
}
