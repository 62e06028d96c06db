//! Event handling utilities

use crossterm::event::{KeyCode, KeyModifiers};

/// Key mapping for browsing (outside the editor)
pub fn key_to_action(key: KeyCode, vim_mode: bool) -> Option<Action> {
    if vim_mode {
        match key {
            KeyCode::Char('j') => return Some(Action::Down),
            KeyCode::Char('k') => return Some(Action::Up),
            KeyCode::Char('l') => return Some(Action::Next),
            KeyCode::Char('h') => return Some(Action::Previous),
            _ => {}
        }
    }

    match key {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Right | KeyCode::Char('n') => Some(Action::Next),
        KeyCode::Left | KeyCode::Char('p') => Some(Action::Previous),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('w') => Some(Action::ToggleWhy),
        KeyCode::Char('e') | KeyCode::Char('i') => Some(Action::Edit),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Key mapping inside the code editor
pub fn editor_key_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<EditorAction> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key {
            KeyCode::Char('s') => Some(EditorAction::Submit),
            KeyCode::Char('a') => Some(EditorAction::LineStart),
            KeyCode::Char('e') => Some(EditorAction::LineEnd),
            _ => None,
        };
    }

    match key {
        KeyCode::Char(c) => Some(EditorAction::Insert(c)),
        KeyCode::Tab => Some(EditorAction::Indent),
        KeyCode::Enter => Some(EditorAction::Newline),
        KeyCode::Backspace => Some(EditorAction::DeleteBack),
        KeyCode::Delete => Some(EditorAction::DeleteForward),
        KeyCode::Left => Some(EditorAction::Left),
        KeyCode::Right => Some(EditorAction::Right),
        KeyCode::Up => Some(EditorAction::Up),
        KeyCode::Down => Some(EditorAction::Down),
        KeyCode::Home => Some(EditorAction::LineStart),
        KeyCode::End => Some(EditorAction::LineEnd),
        KeyCode::F(5) => Some(EditorAction::Submit),
        KeyCode::Esc => Some(EditorAction::Close),
        _ => None,
    }
}

/// Actions that can be taken while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // List navigation
    Up,
    Down,
    Select,
    Back,

    // Steps
    Next,
    Previous,
    Reset,

    // Panels
    ToggleWhy,
    Edit,

    Quit,
}

/// Actions inside the code editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Insert(char),
    Indent,
    Newline,
    DeleteBack,
    DeleteForward,
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    Submit,
    Close,
}
