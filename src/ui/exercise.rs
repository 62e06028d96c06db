//! Exercise screen: current, next-step and goal canvases with the step panel

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::app::state::EditorState;
use crate::engine::{ExerciseSession, ValidationState};
use crate::model::{Highlight, VisualElement};
use crate::syntax::highlight_code;
use crate::theme::Theme;
use crate::ui::layout::{panel, wrap_text};
use crate::ui::{canvas, editor};

/// Draw the open exercise
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    session: &ExerciseSession,
    editor_state: &EditorState,
    theme: &Theme,
) {
    let [header_area, body_area, step_area, gauge_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header_area, session, theme);
    draw_body(frame, body_area, session, theme);

    if session.is_complete() {
        draw_completion(frame, step_area, session, theme);
    } else if session.current_step().is_some_and(|s| s.is_interactive()) {
        let [info_area, editor_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(step_area);
        draw_step(frame, info_area, session, theme);
        editor::draw(
            frame,
            editor_area,
            editor_state,
            &session.view().editor_code,
            session.view().validation,
            theme,
        );
    } else {
        draw_step(frame, step_area, session, theme);
    }

    draw_gauge(frame, gauge_area, session, theme);
}

fn draw_header(frame: &mut Frame, area: Rect, session: &ExerciseSession, theme: &Theme) {
    let exercise = session.exercise();

    let mut title = vec![Span::styled(
        exercise.title.clone(),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    )];
    if !exercise.category.is_empty() {
        title.push(Span::styled(format!("  [{}]", exercise.category), Style::default().fg(theme.info)));
    }
    title.push(Span::styled(
        format!("  {}", exercise.difficulty),
        Style::default().fg(theme.difficulty_color(exercise.difficulty)),
    ));

    let para = Paragraph::new(vec![
        Line::from(title),
        Line::from(Span::styled(exercise.description.clone(), Style::default().fg(theme.fg_secondary))),
    ])
    .block(panel(" Exercise ", false, theme))
    .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

fn draw_body(frame: &mut Frame, area: Rect, session: &ExerciseSession, theme: &Theme) {
    let view = session.view();
    let exercise = session.exercise();
    let language = exercise.language.as_deref();

    let [current_area, next_area, goal_area] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    let current_title = if view.is_animating { " Current Progress … " } else { " Current Progress " };
    draw_column(
        frame,
        current_area,
        Column {
            title: current_title,
            title_color: theme.accent_primary,
            elements: &view.elements,
            highlights: &view.highlights,
            code: view.code.as_deref(),
            language,
        },
        theme,
    );

    let next_title = if view.is_complete { " Final Result " } else { " After This Step " };
    draw_column(
        frame,
        next_area,
        Column {
            title: next_title,
            title_color: theme.info,
            elements: &view.preview.elements,
            highlights: &[],
            code: view.preview.code.as_deref(),
            language,
        },
        theme,
    );

    let (goal_title, goal_color) =
        if view.is_complete { (" Goal ✓ ", theme.success) } else { (" Goal ", theme.warning) };
    draw_column(
        frame,
        goal_area,
        Column {
            title: goal_title,
            title_color: goal_color,
            elements: exercise.after_state.elements(),
            highlights: &[],
            code: exercise.after_state.code.as_deref(),
            language,
        },
        theme,
    );
}

/// One canvas with its code underneath
struct Column<'a> {
    title: &'a str,
    title_color: Color,
    elements: &'a [VisualElement],
    highlights: &'a [Highlight],
    code: Option<&'a str>,
    language: Option<&'a str>,
}

fn draw_column(frame: &mut Frame, area: Rect, column: Column<'_>, theme: &Theme) {
    let block = panel(
        Span::styled(
            column.title.to_string(),
            Style::default().fg(column.title_color).add_modifier(Modifier::BOLD),
        ),
        false,
        theme,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [canvas_area, code_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    canvas::draw(frame, canvas_area, column.elements, column.highlights, theme);

    let code_block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Code ", Style::default().fg(theme.fg_muted)))
        .style(Style::default().bg(theme.bg_secondary));

    let lines = match column.code {
        Some(code) if !code.is_empty() => highlight_code(code, column.language, theme),
        _ => vec![Line::from(Span::styled(
            "No code yet",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        ))],
    };
    frame.render_widget(Paragraph::new(lines).block(code_block), code_area);
}

fn draw_step(frame: &mut Frame, area: Rect, session: &ExerciseSession, theme: &Theme) {
    let view = session.view();
    let Some(step) = session.current_step() else {
        return;
    };

    let block = panel(" Step ", !session.is_animating(), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let width = inner.width;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Step {} of {}", view.step_index + 1, view.total_steps),
                Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}% Complete", view.progress_percent()),
                Style::default().fg(theme.fg_muted),
            ),
        ]),
        Line::from(Span::styled(
            step.title.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(wrap_text(&step.description, width, Style::default().fg(theme.fg_secondary)));

    if let Some(task) = step.task.as_deref().filter(|_| step.is_interactive()) {
        lines.push(Line::default());
        lines.extend(wrap_text(
            &format!("Task: {task}"),
            width,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ));

        match view.validation {
            ValidationState::Correct => lines.push(Line::from(Span::styled(
                "✓ Correct! Moving to the next step...",
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            ))),
            ValidationState::Incorrect => {
                if let Some(hint) = view.hint.as_deref() {
                    lines.extend(wrap_text(
                        &format!("✗ Not quite. Your code should contain: {hint}"),
                        width,
                        Style::default().fg(theme.error),
                    ));
                }
            }
            ValidationState::Idle => {}
        }
    }

    if let Some(why) = step.why.as_deref() {
        lines.push(Line::default());
        if view.why_expanded {
            lines.push(Line::from(Span::styled(
                "▼ Why?",
                Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
            )));
            lines.extend(wrap_text(why, width, Style::default().fg(theme.fg_primary)));
        } else {
            lines.push(Line::from(Span::styled("▶ Why? (w)", Style::default().fg(theme.warning))));
        }
    }

    if view.is_animating {
        lines.push(Line::from(Span::styled(
            "…",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        )));
    }

    let prev_style = nav_style(view.step_index > 0, theme);
    let next_style = nav_style(session.can_advance(), theme);
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("← Previous", prev_style),
        Span::raw("   "),
        Span::styled("Next →", next_style),
        Span::raw("   "),
        Span::styled("r Reset", Style::default().fg(theme.fg_muted)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn nav_style(enabled: bool, theme: &Theme) -> Style {
    if enabled {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM)
    }
}

fn draw_completion(frame: &mut Frame, area: Rect, session: &ExerciseSession, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.success))
        .style(Style::default().bg(theme.bg_primary));

    let para = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "🎉 Exercise Complete!",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("You finished all {} steps of {}.", session.view().total_steps, session.exercise().title),
            Style::default().fg(theme.fg_primary),
        )),
        Line::default(),
        Line::from(Span::styled(
            "r start over · ← review steps · Esc back to classroom",
            Style::default().fg(theme.fg_muted),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn draw_gauge(frame: &mut Frame, area: Rect, session: &ExerciseSession, theme: &Theme) {
    let view = session.view();
    let percent = if view.is_complete { 100 } else { view.progress_percent() };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent_primary).bg(theme.bg_tertiary))
        .percent(u16::from(percent))
        .label(format!("{percent}%"));
    frame.render_widget(gauge, area);
}
