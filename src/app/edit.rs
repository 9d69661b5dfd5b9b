use super::config::Config;
use super::types::{char_to_byte_idx, FileState, Mode};
use super::App;

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll_row: 0,
            scroll_col: 0,
            mode: Mode::Normal,
            file_name: String::new(),
            file_state: FileState::Unset,
            status_message: String::new(),
            command_buffer: String::new(),
            last_command: String::new(),
            running: true,
            config,
            pending: Vec::new(),
            shown: Vec::new(),
            status_bar: String::new(),
            term_width: 0,
            term_height: 0,
            text_width: 0,
            text_height: 0,
            size_changed: false,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.file_state = FileState::Dirty;
    }

    // Buffer primitives. All of them are silent no-ops on out-of-range
    // coordinates; callers never have to prove bounds first.

    pub(crate) fn insert_char(&mut self, col: usize, row: usize, ch: char) {
        if row < self.lines.len() && col <= self.line_len(row) {
            let idx = char_to_byte_idx(&self.lines[row], col);
            self.lines[row].insert(idx, ch);
        }
    }

    pub(crate) fn remove_char(&mut self, col: usize, row: usize) {
        if row < self.lines.len() && col < self.line_len(row) {
            let line = &mut self.lines[row];
            let start = char_to_byte_idx(line, col);
            let end = char_to_byte_idx(line, col + 1);
            line.replace_range(start..end, "");
        }
    }

    pub(crate) fn insert_line(&mut self, row: usize, content: String) {
        if row <= self.lines.len() {
            self.lines.insert(row, content);
        }
    }

    pub(crate) fn remove_line(&mut self, row: usize) {
        if row < self.lines.len() {
            self.lines.remove(row);
        }
    }

    pub(crate) fn join_line(&mut self, row: usize) {
        if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        }
    }

    pub(crate) fn split_line(&mut self, col: usize, row: usize) {
        if row < self.lines.len() && col <= self.line_len(row) {
            let idx = char_to_byte_idx(&self.lines[row], col);
            let suffix = self.lines[row].split_off(idx);
            self.lines.insert(row + 1, suffix);
        }
    }

    // Edit handlers behind the normal-mode keys.

    pub(crate) fn type_char(&mut self, ch: char) {
        self.insert_char(self.cursor_col, self.cursor_row, ch);
        self.move_cursor(1, 0);
        self.mark_dirty();
    }

    /// Enter: split at the cursor, then land on column 0 of the new line.
    pub(crate) fn newline(&mut self) {
        self.split_line(self.cursor_col, self.cursor_row);
        let prefix_len = self.line_len(self.cursor_row) as isize;
        self.move_cursor(-prefix_len, 1);
        self.mark_dirty();
    }

    /// Backspace: join onto the previous line at column 0, otherwise delete
    /// the character to the left. The cursor ends up at the join point.
    pub(crate) fn backspace(&mut self) {
        if self.cursor_col == 0 && self.cursor_row > 0 {
            let prev_len = self.line_len(self.cursor_row - 1) as isize;
            self.join_line(self.cursor_row - 1);
            self.move_cursor(0, -1);
            self.move_cursor(prev_len, 0);
        } else if self.cursor_col > 0 {
            self.remove_char(self.cursor_col - 1, self.cursor_row);
            self.move_cursor(-1, 0);
        }
        self.mark_dirty();
    }

    /// Tab inserts a literal run of spaces up to the configured tab width.
    pub(crate) fn tab_key(&mut self) {
        let width = self.config.tab_width.max(1);
        for _ in 0..width {
            self.insert_char(self.cursor_col, self.cursor_row, ' ');
        }
        self.move_cursor(width as isize, 0);
        self.mark_dirty();
    }
}
