//! Syntax highlighting using syntect
//!
//! Exercise code is short and mostly HTML, CSS or JavaScript. Whole snippets are
//! highlighted at once so multi-line constructs keep their parse state.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::highlighting::{
    FontStyle, HighlightState, Highlighter, RangedHighlightIterator, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use crate::theme::Theme;

/// Global syntax set with all default syntaxes
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Global theme set (only its token colors are used)
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// syntect theme providing token colors
const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Map common language names/aliases to syntect syntax names
fn normalize_language(lang: &str) -> &str {
    match lang.trim().to_lowercase().as_str() {
        "html" | "htm" | "xhtml" => "HTML",
        "css" => "CSS",
        "js" | "javascript" | "jsx" | "ts" | "typescript" => "JavaScript",
        "json" => "JSON",
        "xml" | "svg" => "XML",
        "md" | "markdown" => "Markdown",
        "py" | "python" => "Python",
        "rs" | "rust" => "Rust",
        "sh" | "bash" | "shell" => "Bourne Again Shell (bash)",
        _ => lang,
    }
}

/// Guess the language of a snippet when the exercise does not say
pub fn guess_language(code: &str) -> &'static str {
    let trimmed = code.trim_start();
    if trimmed.starts_with('<') {
        "html"
    } else if !code.contains('(') && code.contains('{') && code.contains(':') {
        "css"
    } else {
        "javascript"
    }
}

/// Find the syntax definition for a given language
fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let normalized = normalize_language(language);
    SYNTAX_SET
        .find_syntax_by_name(normalized)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(&normalized.to_lowercase()))
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(language))
}

/// Convert a syntect color to a ratatui color
fn syntect_to_ratatui_color(color: syntect::highlighting::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn to_ratatui_style(style: syntect::highlighting::Style, theme: &Theme) -> Style {
    let mut ratatui_style =
        Style::default().fg(syntect_to_ratatui_color(style.foreground)).bg(theme.bg_secondary);

    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    ratatui_style
}

/// Highlight a code snippet into styled lines
///
/// Falls back to plain lines (comments dimmed) when the language is unknown.
pub fn highlight_code(code: &str, language: Option<&str>, theme: &Theme) -> Vec<Line<'static>> {
    let language = language.unwrap_or_else(|| guess_language(code));
    let (Some(syntax), Some(syntect_theme)) =
        (find_syntax(language), THEME_SET.themes.get(SYNTECT_THEME))
    else {
        return code.lines().map(|line| plain_line(line, theme)).collect();
    };

    let highlighter = Highlighter::new(syntect_theme);
    let mut parse_state = ParseState::new(syntax);
    let mut highlight_state = HighlightState::new(&highlighter, ScopeStack::new());

    code.lines()
        .map(|line| {
            let text = format!("{line}\n");
            let ops = parse_state.parse_line(&text, &SYNTAX_SET).unwrap_or_default();
            let spans: Vec<Span<'static>> =
                RangedHighlightIterator::new(&mut highlight_state, &ops, &text, &highlighter)
                    .filter_map(|(style, token, _range)| {
                        let token = token.trim_end_matches('\n');
                        (!token.is_empty())
                            .then(|| Span::styled(token.to_string(), to_ratatui_style(style, theme)))
                    })
                    .collect();

            if spans.is_empty() { plain_line(line, theme) } else { Line::from(spans) }
        })
        .collect()
}

/// An unhighlighted line, with line comments dimmed
fn plain_line(line: &str, theme: &Theme) -> Line<'static> {
    let base = Style::default().fg(theme.code_fg).bg(theme.bg_secondary);
    let comment = Style::default().fg(theme.code_comment).bg(theme.bg_secondary);

    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("<!--") || trimmed.starts_with("/*") {
        Line::from(Span::styled(line.to_string(), comment))
    } else {
        Line::from(Span::styled(line.to_string(), base))
    }
}

/// Check if a language is supported
pub fn is_language_supported(language: &str) -> bool {
    find_syntax(language).is_some()
}
