//! Code editor panel for interactive steps

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::EditorState;
use crate::engine::ValidationState;
use crate::theme::Theme;
use crate::ui::layout::panel;

/// Draw the editor
///
/// While the editor is active its buffer is shown with a cursor; otherwise the
/// session's editor code is shown read-only.
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    editor: &EditorState,
    code: &str,
    validation: ValidationState,
    theme: &Theme,
) {
    let (title, title_color) = match validation {
        ValidationState::Correct => (" Your Code ✓ ", theme.success),
        ValidationState::Incorrect => (" Your Code ✗ ", theme.error),
        ValidationState::Idle if editor.active => (" Your Code (editing) ", theme.accent_primary),
        ValidationState::Idle => (" Your Code (e to edit) ", theme.fg_muted),
    };

    let block = panel(Span::styled(title, Style::default().fg(title_color)), editor.active, theme);
    let text_style = Style::default().fg(theme.code_fg);

    let lines: Vec<Line> = if editor.active {
        let (cursor_line, cursor_col) = editor.cursor_line_col();
        editor
            .buffer
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                if i == cursor_line {
                    build_line_with_cursor(line, cursor_col, text_style, theme)
                } else {
                    Line::from(Span::styled(line.to_string(), text_style))
                }
            })
            .collect()
    } else {
        code.lines().map(|line| Line::from(Span::styled(line.to_string(), text_style))).collect()
    };

    // Keep the cursor line in view
    let scroll = if editor.active {
        let (line, _) = editor.cursor_line_col();
        let visible = usize::from(area.height.saturating_sub(2));
        line.saturating_sub(visible.saturating_sub(1))
    } else {
        0
    };

    let para = Paragraph::new(lines).block(block).scroll((scroll as u16, 0));
    frame.render_widget(para, area);
}

/// Build a line with a visible cursor
fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Space when the cursor is past the last character
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style = Style::default().fg(theme.bg_primary).bg(theme.cursor).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}
