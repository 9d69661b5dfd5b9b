use anyhow::Result;

use super::types::{is_printable, Mode};
use super::App;
use crate::term::{Key, TerminalDriver};

/// Dispatches one key event. Editing keys act only in normal mode; in
/// command mode printable characters feed the accumulator and Enter runs it.
pub fn handle_key(app: &mut App, key: Key, driver: &mut dyn TerminalDriver) -> Result<()> {
    match key {
        Key::Up => {
            if app.mode == Mode::Normal {
                if app.cursor_row == 0 {
                    app.move_cursor(-(app.cursor_col as isize), 0);
                } else {
                    app.move_cursor(0, -1);
                }
            }
        }
        Key::Down => {
            if app.mode == Mode::Normal {
                if app.cursor_row == app.lines.len() - 1 {
                    let len = app.line_len(app.cursor_row) as isize;
                    app.move_cursor(len - app.cursor_col as isize, 0);
                } else {
                    app.move_cursor(0, 1);
                }
            }
        }
        Key::Left => {
            if app.mode == Mode::Normal && app.cursor_col > 0 {
                app.move_cursor(-1, 0);
            }
        }
        Key::Right => {
            if app.mode == Mode::Normal && app.cursor_col < app.line_len(app.cursor_row) {
                app.move_cursor(1, 0);
            }
        }
        Key::Backspace => {
            if app.mode == Mode::Normal {
                app.backspace();
            }
        }
        Key::Enter => match app.mode {
            Mode::Normal => app.newline(),
            Mode::Command => {
                let cmd = std::mem::take(&mut app.command_buffer);
                app.execute_command(&cmd, driver)?;
                app.mode = Mode::Normal;
            }
        },
        Key::Tab => {
            if app.mode == Mode::Normal {
                app.tab_key();
            }
        }
        Key::Esc => match app.mode {
            Mode::Normal => app.mode = Mode::Command,
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
            }
        },
        Key::Char(ch) if is_printable(ch) => match app.mode {
            Mode::Normal => app.type_char(ch),
            Mode::Command => app.command_buffer.push(ch),
        },
        Key::Char(_) | Key::Resize | Key::Other => {}
    }
    Ok(())
}
