use super::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
}

/// Relationship between the buffer and the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// No file backs the buffer yet (untitled, or a named file that does
    /// not exist on disk).
    Unset,
    /// Buffer matches what was last loaded or saved.
    Clean,
    /// Unsaved changes.
    Dirty,
}

/// The whole editor session: document, cursor, viewport, file association,
/// command state and the two frame buffers the renderer diffs.
pub struct App {
    pub(crate) lines: Vec<String>,
    pub(crate) cursor_row: usize,
    pub(crate) cursor_col: usize,
    pub(crate) scroll_row: usize,
    pub(crate) scroll_col: usize,
    pub(crate) mode: Mode,
    pub(crate) file_name: String,
    pub(crate) file_state: FileState,
    pub(crate) status_message: String,
    pub(crate) command_buffer: String,
    pub(crate) last_command: String,
    pub(crate) running: bool,
    pub(crate) config: Config,
    // Frame state. `pending` is rebuilt from scratch every tick; `shown`
    // holds what is currently on screen so the renderer can diff rows.
    pub(crate) pending: Vec<String>,
    pub(crate) shown: Vec<String>,
    pub(crate) status_bar: String,
    pub(crate) term_width: usize,
    pub(crate) term_height: usize,
    pub(crate) text_width: usize,
    pub(crate) text_height: usize,
    pub(crate) size_changed: bool,
}

pub(crate) fn is_printable(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

/// Columns are char positions; strings store bytes. This maps between the
/// two without ever landing inside a multi-byte sequence.
pub(crate) fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Expands tabs to the next multiple-of-`tab_width` column boundary.
/// Expansion width depends on the running column, so tabs are not
/// constant-width.
pub fn expand_tabs(s: &str, tab_width: usize) -> String {
    let tab = tab_width.max(1);
    let mut out = String::with_capacity(s.len());
    let mut col = 0usize;
    for ch in s.chars() {
        if ch == '\t' {
            let spaces = tab - (col % tab);
            for _ in 0..spaces {
                out.push(' ');
            }
            col += spaces;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Visual width of `s` under the same tab-stop rule as `expand_tabs`,
/// without materializing the expanded string. Always equals the character
/// count of `expand_tabs(s, tab_width)`.
pub fn visual_width(s: &str, tab_width: usize) -> usize {
    let tab = tab_width.max(1);
    let mut col = 0usize;
    for ch in s.chars() {
        if ch == '\t' {
            col += tab - (col % tab);
        } else {
            col += 1;
        }
    }
    col
}

/// Visual column of the buffer column `col`, i.e. the width of the line
/// prefix `[0, col)`.
pub fn visual_col(s: &str, col: usize, tab_width: usize) -> usize {
    let tab = tab_width.max(1);
    let mut width = 0usize;
    for ch in s.chars().take(col) {
        if ch == '\t' {
            width += tab - (width % tab);
        } else {
            width += 1;
        }
    }
    width
}
