//! Application state and event handling

pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::engine::{SubmitOutcome, TransitionOutcome};
use crate::model::Catalog;
use crate::theme::Theme;
use crate::ui;
use input::{Action, EditorAction};
use state::{AppState, Route};

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Active color theme
    theme: Theme,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance at the given route
    pub fn new(config: Config, catalog: Catalog, route: Route) -> Result<Self> {
        let mut state = AppState::new(catalog, config.timing());
        // Unknown ids stay on the classroom list with the error on the status line
        let _ = state.navigate(route);

        let terminal = Self::setup_terminal()?;
        let theme = config.active_theme();

        Ok(Self { config, theme, state, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &self.state, &self.theme);
            })?;

            // Handle events
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key) {
                            Ok(true) => break, // Exit requested
                            Ok(false) => {}    // Continue
                            Err(e) => {
                                tracing::error!("Error handling key: {}", e);
                            }
                        }
                    }
                }
            }

            // Apply due step transitions
            self.state.tick(Instant::now());
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Handle a key press, returns true if should exit
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.editor.active {
            if let Some(action) = input::editor_key_to_action(key.code, key.modifiers) {
                self.handle_editor_action(action);
            }
            return Ok(false);
        }

        let Some(action) = input::key_to_action(key.code, self.config.vim_mode) else {
            return Ok(false);
        };
        Ok(self.handle_action(action))
    }

    /// Apply a browsing action, returns true if should exit
    fn handle_action(&mut self, action: Action) -> bool {
        let now = Instant::now();

        match action {
            Action::Quit => return true,
            Action::Up => self.state.move_selection(-1),
            Action::Down => self.state.move_selection(1),
            Action::Select => {
                if let Some(route) = self.state.selected_route() {
                    let _ = self.state.navigate(route);
                }
            }
            Action::Back => {
                if self.state.route != Route::Classrooms {
                    let _ = self.state.navigate(self.state.route.parent());
                }
            }
            Action::Next => {
                if let Some(session) = self.state.session.as_mut() {
                    match session.advance(now) {
                        TransitionOutcome::Blocked => {
                            self.state.status.set_error("Complete the task first (press e to edit)")
                        }
                        TransitionOutcome::OutOfRange => {
                            self.state.status.set_message("Exercise complete. Press r to start over")
                        }
                        TransitionOutcome::Scheduled(_) => self.state.status.clear(),
                        TransitionOutcome::Busy => {}
                    }
                }
            }
            Action::Previous => {
                if let Some(session) = self.state.session.as_mut() {
                    if session.retreat(now).is_scheduled() {
                        self.state.status.clear();
                    }
                }
            }
            Action::Reset => {
                if let Some(session) = self.state.session.as_mut() {
                    session.reset();
                    self.state.status.set_message("Exercise reset");
                }
            }
            Action::ToggleWhy => {
                if let Some(session) = self.state.session.as_mut() {
                    if session.current_step().is_some_and(|s| s.why.is_some()) {
                        session.toggle_why();
                    }
                }
            }
            Action::Edit => {
                if self.state.open_editor() {
                    self.state.status.set_message("Editing: Ctrl-s to check, Esc to stop");
                }
            }
        }

        false
    }

    /// Apply an editor action to the buffer and the session
    fn handle_editor_action(&mut self, action: EditorAction) {
        let editor = &mut self.state.editor;
        let Some(session) = self.state.session.as_mut() else {
            editor.close();
            return;
        };

        match action {
            EditorAction::Insert(c) => editor.insert_char(c),
            EditorAction::Indent => {
                editor.insert_char(' ');
                editor.insert_char(' ');
            }
            EditorAction::Newline => editor.insert_char('\n'),
            EditorAction::DeleteBack => editor.delete_char(),
            EditorAction::DeleteForward => editor.delete_char_forward(),
            EditorAction::Left => editor.move_left(),
            EditorAction::Right => editor.move_right(),
            EditorAction::Up => editor.move_up(),
            EditorAction::Down => editor.move_down(),
            EditorAction::LineStart => editor.move_line_start(),
            EditorAction::LineEnd => editor.move_line_end(),
            EditorAction::Close => {
                editor.close();
                self.state.status.clear();
                return;
            }
            EditorAction::Submit => {
                match session.submit(Instant::now()) {
                    SubmitOutcome::Correct(_) => {
                        editor.close();
                        self.state.status.set_message("Correct! Moving on...");
                    }
                    SubmitOutcome::Incorrect { hint } => {
                        self.state.status.set_error(format!("Not quite. Your code should contain: {hint}"));
                    }
                    SubmitOutcome::Ignored => {}
                }
                return;
            }
        }

        if session.editor_code() != editor.buffer {
            session.edit(editor.buffer.clone());
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
