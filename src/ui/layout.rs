//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Rectangle of the given percentage size centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(row);
    cell
}

/// Draw a centered message box, used when a route has nothing to show
pub fn draw_message(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let rect = centered_rect(60, 30, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));

    let para = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
    )))
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(para, rect);
}

/// Titled panel block, with the focused border color when `focused`
pub fn panel<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused { theme.border_focused } else { theme.border };
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.bg_primary))
}

/// Wrap prose to `width` columns, one line per wrapped row
pub fn wrap_text(text: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    textwrap::wrap(text, width)
        .into_iter()
        .map(|row| Line::from(Span::styled(row.into_owned(), style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 50, area);
        assert_eq!((rect.x, rect.width, rect.height), (25, 50, 25));
        assert!((12..=13).contains(&rect.y));
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let lines = wrap_text("one two three four", 9, Style::default());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].content, "one two");
    }

    #[test]
    fn wrap_text_survives_zero_width() {
        let lines = wrap_text("abc", 0, Style::default());
        assert!(!lines.is_empty());
    }
}
