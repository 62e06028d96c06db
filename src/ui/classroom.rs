//! Exercise list for one classroom

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::model::Classroom;
use crate::theme::Theme;
use crate::ui::classrooms::scroll_for;
use crate::ui::layout::{draw_message, panel};

/// Rows drawn per exercise: title, description, spacer
const ROWS_PER_ENTRY: usize = 3;

/// Draw the classroom header and its exercises
pub fn draw(frame: &mut Frame, area: Rect, classroom: &Classroom, selected: usize, theme: &Theme) {
    let [header_area, list_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            classroom.name.clone(),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(classroom.description.clone(), Style::default().fg(theme.fg_secondary))),
    ])
    .block(panel(" Classroom ", false, theme))
    .wrap(Wrap { trim: true });
    frame.render_widget(header, header_area);

    if classroom.exercises.is_empty() {
        draw_message(frame, list_area, "This classroom has no exercises yet", theme);
        return;
    }

    let block = panel(" Exercises ", true, theme);
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, exercise) in classroom.exercises.iter().enumerate() {
        let is_selected = i == selected;
        let marker = if is_selected { "▶ " } else { "  " };

        let title_style = if is_selected {
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD)
        };

        let mut spans = vec![Span::styled(format!("{marker}{}", exercise.title), title_style)];
        if !exercise.category.is_empty() {
            spans.push(Span::styled(
                format!("  [{}]", exercise.category),
                Style::default().fg(theme.info),
            ));
        }
        spans.push(Span::styled(
            format!("  {}", exercise.difficulty),
            Style::default().fg(theme.difficulty_color(exercise.difficulty)),
        ));
        spans.push(Span::styled(
            format!("  {} steps", exercise.total_steps()),
            Style::default().fg(theme.fg_muted),
        ));
        if exercise.is_interactive() {
            spans.push(Span::styled("  ✎ hands-on", Style::default().fg(theme.accent_secondary)));
        }

        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(
            format!("    {}", exercise.description),
            Style::default().fg(theme.fg_secondary),
        )));
        lines.push(Line::default());
    }

    let scroll = scroll_for(selected, ROWS_PER_ENTRY, usize::from(inner.height));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}
