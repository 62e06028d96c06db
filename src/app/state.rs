//! Application state definitions

use std::sync::Arc;
use std::time::Instant;

use crate::engine::{ExerciseSession, Timing, ValidationState};
use crate::error::DojoError;
use crate::model::Catalog;

/// Where the viewer currently is, addressed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Classrooms,
    Classroom(String),
    Exercise { classroom: String, exercise: String },
}

impl Route {
    /// Route for the optional ids given on the command line
    pub fn from_ids(classroom: Option<String>, exercise: Option<String>) -> Self {
        match (classroom, exercise) {
            (Some(classroom), Some(exercise)) => Route::Exercise { classroom, exercise },
            (Some(classroom), None) => Route::Classroom(classroom),
            _ => Route::Classrooms,
        }
    }

    /// One level up
    pub fn parent(&self) -> Route {
        match self {
            Route::Classrooms | Route::Classroom(_) => Route::Classrooms,
            Route::Exercise { classroom, .. } => Route::Classroom(classroom.clone()),
        }
    }
}

/// Status line message
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Message to display
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
}

impl StatusLine {
    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    /// Clear the message
    pub fn clear(&mut self) {
        self.message = None;
    }
}

/// Cursor-tracking text buffer for the code editor
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// Whether keystrokes go to the editor
    pub active: bool,
    /// Text being edited
    pub buffer: String,
    /// Cursor position as a character index
    pub cursor: usize,
}

impl EditorState {
    /// Start editing the given text with the cursor at the end
    pub fn open(&mut self, text: &str) {
        self.active = true;
        self.buffer = text.to_string();
        self.cursor = self.char_count();
    }

    /// Stop editing
    pub fn close(&mut self) {
        self.active = false;
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.buffer.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.buffer.len())
    }

    /// Get the number of characters in the buffer
    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.buffer.remove(byte_idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.buffer.remove(byte_idx);
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to the start of the current line
    pub fn move_line_start(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    /// Move cursor to the end of the current line
    pub fn move_line_end(&mut self) {
        let rest = self.buffer.chars().skip(self.cursor).take_while(|&c| c != '\n').count();
        self.cursor += rest;
    }

    /// Move cursor to the same column on the previous line
    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.cursor = self.index_at(line - 1, col);
        }
    }

    /// Move cursor to the same column on the next line
    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.buffer.split('\n').count() {
            self.cursor = self.index_at(line + 1, col);
        }
    }

    /// Character index of `col` on `line`, clamped to the line's length
    fn index_at(&self, line: usize, col: usize) -> usize {
        let mut index = 0;
        for (i, text) in self.buffer.split('\n').enumerate() {
            let len = text.chars().count();
            if i == line {
                return index + col.min(len);
            }
            index += len + 1;
        }
        self.char_count()
    }

    /// Line and column (both 0-based, in characters) of the cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.buffer.chars().take(self.cursor) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

/// Full application state
#[derive(Debug)]
pub struct AppState {
    /// All classrooms
    pub catalog: Catalog,

    /// Current location
    pub route: Route,

    /// Selected row in the classroom list
    pub classroom_selected: usize,

    /// Selected row in the exercise list of a classroom
    pub exercise_selected: usize,

    /// Open exercise, present only on an exercise route
    pub session: Option<ExerciseSession>,

    /// Code editor for interactive steps
    pub editor: EditorState,

    /// Status line
    pub status: StatusLine,

    /// Delays for new sessions
    pub timing: Timing,
}

impl AppState {
    /// Create state at the classroom list
    pub fn new(catalog: Catalog, timing: Timing) -> Self {
        Self {
            catalog,
            route: Route::Classrooms,
            classroom_selected: 0,
            exercise_selected: 0,
            session: None,
            editor: EditorState::default(),
            status: StatusLine::default(),
            timing,
        }
    }

    /// Go to a route, opening a fresh session for exercise routes
    ///
    /// Unknown ids leave the current location untouched and are reported on the
    /// status line.
    pub fn navigate(&mut self, route: Route) -> Result<(), DojoError> {
        let result = self.enter(&route);
        match &result {
            Ok(()) => {
                tracing::info!("Navigated to {:?}", route);
                self.route = route;
                self.status.clear();
            }
            Err(e) => {
                tracing::warn!("Navigation failed: {}", e);
                self.status.set_error(e.to_string());
            }
        }
        result
    }

    fn enter(&mut self, route: &Route) -> Result<(), DojoError> {
        match route {
            Route::Classrooms => {
                self.session = None;
            }
            Route::Classroom(id) => {
                let index = self.catalog.classrooms.iter().position(|c| &c.id == id);
                let index = index.ok_or_else(|| DojoError::ClassroomNotFound(id.clone()))?;
                // Keep the exercise selection when coming back from that classroom's exercise
                if !matches!(&self.route, Route::Exercise { classroom, .. } if classroom == id) {
                    self.exercise_selected = 0;
                }
                self.classroom_selected = index;
                self.session = None;
            }
            Route::Exercise { classroom, exercise } => {
                let found = self.catalog.exercise(classroom, exercise)?;
                let session = ExerciseSession::new(Arc::new(found.clone()), self.timing);
                self.classroom_selected = self
                    .catalog
                    .classrooms
                    .iter()
                    .position(|c| &c.id == classroom)
                    .unwrap_or_default();
                self.exercise_selected = self.catalog.classrooms[self.classroom_selected]
                    .exercises
                    .iter()
                    .position(|e| &e.id == exercise)
                    .unwrap_or_default();
                self.session = Some(session);
            }
        }
        self.editor.close();
        Ok(())
    }

    /// Open the editor on the current step's code
    ///
    /// Only an interactive step that is not moving and not already answered
    /// correctly can be edited. Returns whether the editor opened.
    pub fn open_editor(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let editable = session.current_step().is_some_and(|s| s.is_interactive())
            && session.validation() != ValidationState::Correct
            && !session.is_animating();
        if editable {
            self.editor.open(session.editor_code());
        }
        editable
    }

    /// Run due session work; returns whether anything changed
    ///
    /// An open editor follows the session: it is closed while a step change is
    /// pending or on a step without a task, and reloaded otherwise.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.tick(now) {
            return false;
        }

        if self.editor.active {
            let editable = session.current_step().is_some_and(|s| s.is_interactive())
                && !session.is_animating();
            if editable {
                self.editor.open(session.editor_code());
            } else {
                self.editor.close();
            }
        }
        true
    }

    /// Route of the highlighted row on list screens
    pub fn selected_route(&self) -> Option<Route> {
        match &self.route {
            Route::Classrooms => {
                self.catalog.classrooms.get(self.classroom_selected).map(|c| Route::Classroom(c.id.clone()))
            }
            Route::Classroom(id) => {
                let classroom = self.catalog.classroom(id).ok()?;
                classroom.exercises.get(self.exercise_selected).map(|e| Route::Exercise {
                    classroom: classroom.id.clone(),
                    exercise: e.id.clone(),
                })
            }
            Route::Exercise { .. } => None,
        }
    }

    /// Number of rows on the current list screen
    pub fn list_len(&self) -> usize {
        match &self.route {
            Route::Classrooms => self.catalog.classrooms.len(),
            Route::Classroom(id) => self.catalog.classroom(id).map(|c| c.exercises.len()).unwrap_or(0),
            Route::Exercise { .. } => 0,
        }
    }

    /// Move the list selection by `delta`, clamped to the list
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let selected = match self.route {
            Route::Classrooms => &mut self.classroom_selected,
            Route::Classroom(_) => &mut self.exercise_selected,
            Route::Exercise { .. } => return,
        };
        *selected = selected.saturating_add_signed(delta).min(len - 1);
    }
}
