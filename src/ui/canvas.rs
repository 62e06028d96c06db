//! Exercise canvas: positioned elements and step highlights
//!
//! Element geometry is in pixels; it is scaled into terminal cells so the whole
//! logical canvas fits the panel.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::model::{Highlight, VisualElement};
use crate::theme::Theme;

/// Minimum logical canvas size in pixels
const MIN_EXTENT: (f64, f64) = (450.0, 400.0);

/// Space kept right of and below the furthest element
const EXTENT_MARGIN: f64 = 10.0;

/// Smallest cell size that still shows a border and one line of text
const MIN_CELLS: u16 = 3;

/// Logical size of a canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    /// Large enough for every element and highlight
    pub fn covering(elements: &[VisualElement], highlights: &[Highlight]) -> Self {
        let edges = elements
            .iter()
            .map(|e| (e.x + e.width, e.y + e.height))
            .chain(highlights.iter().map(|h| (h.x + h.width, h.y + h.height)));

        let (width, height) = edges.fold(MIN_EXTENT, |(w, h), (right, bottom)| {
            (w.max(right + EXTENT_MARGIN), h.max(bottom + EXTENT_MARGIN))
        });
        Self { width, height }
    }
}

/// Scale a pixel rectangle into cells of `area`, clipped to it
pub fn project(area: Rect, extent: Extent, x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    if area.width < MIN_CELLS || area.height < MIN_CELLS {
        return None;
    }

    let scale_x = f64::from(area.width) / extent.width;
    let scale_y = f64::from(area.height) / extent.height;

    let left = (x * scale_x).round().max(0.0) as u16;
    let top = (y * scale_y).round().max(0.0) as u16;
    if left >= area.width || top >= area.height {
        return None;
    }

    let cells_w = ((width * scale_x).round() as u16).max(MIN_CELLS).min(area.width - left);
    let cells_h = ((height * scale_y).round() as u16).max(MIN_CELLS).min(area.height - top);
    Some(Rect::new(area.x + left, area.y + top, cells_w, cells_h))
}

/// Parse a CSS color value (hex or a handful of names)
pub fn parse_css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let mut rgb = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Color::Rgb(rgb.next()??, rgb.next()??, rgb.next()??))
            }
            6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        };
    }

    match value.to_lowercase().as_str() {
        "white" => Some(Color::Rgb(255, 255, 255)),
        "black" => Some(Color::Rgb(0, 0, 0)),
        "red" => Some(Color::Rgb(255, 0, 0)),
        "green" => Some(Color::Rgb(0, 128, 0)),
        "blue" => Some(Color::Rgb(0, 0, 255)),
        "gray" | "grey" => Some(Color::Rgb(128, 128, 128)),
        "yellow" => Some(Color::Rgb(255, 255, 0)),
        "orange" => Some(Color::Rgb(255, 165, 0)),
        _ => None,
    }
}

/// First color found in a shorthand such as `2px solid #4CAF50`
fn shorthand_color(value: &str) -> Option<Color> {
    value.split_whitespace().find_map(parse_css_color)
}

/// Draw elements, then highlights on top
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    elements: &[VisualElement],
    highlights: &[Highlight],
    theme: &Theme,
) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.canvas_bg)), area);

    let extent = Extent::covering(elements, highlights);

    for element in elements {
        if let Some(rect) = project(area, extent, element.x, element.y, element.width, element.height)
        {
            draw_element(frame, rect, element, theme);
        }
    }

    for highlight in highlights {
        if let Some(rect) =
            project(area, extent, highlight.x, highlight.y, highlight.width, highlight.height)
        {
            draw_highlight(frame, rect, highlight, theme);
        }
    }
}

fn draw_element(frame: &mut Frame, rect: Rect, element: &VisualElement, theme: &Theme) {
    let bg = element.style_value("backgroundColor").and_then(parse_css_color);
    let fg = element.style_value("color").and_then(parse_css_color).unwrap_or(theme.fg_secondary);
    let border = element.style_value("border");
    let border_color = border.and_then(shorthand_color).unwrap_or(theme.element_border);

    let mut style = Style::default().fg(fg);
    if let Some(bg) = bg {
        style = style.bg(bg);
    }

    let border_type = if element.kind == "button" || element.style_value("borderRadius").is_some()
    {
        BorderType::Rounded
    } else {
        BorderType::Plain
    };

    let borders = if border == Some("none") { Borders::NONE } else { Borders::ALL };

    let block = Block::default()
        .borders(borders)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color))
        .style(style);

    let content_style =
        if element.kind == "button" { style.add_modifier(Modifier::BOLD) } else { style };

    let para = Paragraph::new(Line::from(Span::styled(element.content.clone(), content_style)))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, rect);
}

fn draw_highlight(frame: &mut Frame, rect: Rect, highlight: &Highlight, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        .title(Span::styled(
            format!(" {} ", highlight.description),
            Style::default().fg(theme.bg_primary).bg(theme.highlight),
        ));
    frame.render_widget(block, rect);
}
