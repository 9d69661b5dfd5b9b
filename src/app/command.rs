use anyhow::Result;

use super::file::{save_lines, valid_filename};
use super::types::{is_printable, FileState};
use super::App;
use crate::logging;
use crate::term::{Key, TerminalDriver};

/// `.` re-executes the stored command, which may itself contain `.`; the
/// depth cap turns a self-referential chain into a message instead of
/// unbounded recursion.
const MAX_REPEAT_DEPTH: usize = 16;

impl App {
    /// Runs an accumulated command string and, if it ran to completion,
    /// stores it for `.` repetition.
    pub(crate) fn execute_command(
        &mut self,
        cmd: &str,
        driver: &mut dyn TerminalDriver,
    ) -> Result<()> {
        if cmd.is_empty() {
            return Ok(());
        }
        logging::log(&format!("command: {cmd}"));
        let completed = self.run_command(cmd, driver, 0)?;
        if completed {
            self.last_command = cmd.to_string();
        }
        Ok(())
    }

    /// Executes each command character in sequence. An unknown character
    /// aborts the remainder; an abort inside a `.` expansion does not abort
    /// the outer sequence.
    fn run_command(
        &mut self,
        cmd: &str,
        driver: &mut dyn TerminalDriver,
        depth: usize,
    ) -> Result<bool> {
        if depth >= MAX_REPEAT_DEPTH {
            self.set_status("Repeat depth limit reached!");
            return Ok(false);
        }

        for ch in cmd.chars() {
            match ch {
                '.' => {
                    let last = self.last_command.clone();
                    let _ = self.run_command(&last, driver, depth + 1)?;
                }
                's' => self.save_current(),
                'w' => self.write_as_prompt(driver)?,
                'q' => {
                    if self.file_state == FileState::Dirty {
                        self.set_status("No write since last change (use Q to override)!");
                    } else {
                        self.running = false;
                    }
                }
                'Q' => self.running = false,
                'd' => self.delete_current_line(),
                other => {
                    self.set_status(format!("Unknown command: {other}"));
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn save_current(&mut self) {
        let name = self.file_name.clone();
        match save_lines(&name, &self.lines) {
            Ok(()) => {
                self.set_status(format!("Successfully written to {name}"));
                self.file_state = FileState::Clean;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// The column is clamped by hand: when row 0 is deleted the row does
    /// not change, so `move_cursor`'s row-change clamp would not fire and a
    /// stale column could wrap the cursor onto the next line.
    fn delete_current_line(&mut self) {
        if self.lines.len() > 1 {
            self.remove_line(self.cursor_row);
            self.cursor_row = self.cursor_row.saturating_sub(1);
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
            self.scroll_to_fit();
            self.mark_dirty();
        } else {
            self.set_status("Only one line left!");
        }
    }

    /// The `w` command: collect a filename on the message line with its own
    /// blocking key loop. Enter validates, saves and adopts the name;
    /// Escape abandons the prompt.
    fn write_as_prompt(&mut self, driver: &mut dyn TerminalDriver) -> Result<()> {
        const PROMPT: &str = "Write file: ";
        let row = self.term_height.saturating_sub(1);

        self.set_status(PROMPT);
        let mut prompt_row = String::from(PROMPT);
        while prompt_row.len() < self.term_width {
            prompt_row.push(' ');
        }
        driver.write_row(row, &prompt_row)?;
        driver.move_cursor(row, PROMPT.len())?;
        driver.flush()?;

        let mut name = String::new();
        loop {
            match driver.read_key()? {
                Key::Esc => break,
                Key::Enter => {
                    if name.is_empty() {
                        self.set_status("Empty filename!");
                    } else if !valid_filename(&name) {
                        self.set_status("Invalid filename!");
                    } else {
                        match save_lines(&name, &self.lines) {
                            Ok(()) => {
                                self.file_name = name.clone();
                                self.file_state = FileState::Clean;
                                self.set_status(format!("Successfully written to {name}"));
                            }
                            Err(e) => self.set_status(e.to_string()),
                        }
                    }
                    break;
                }
                Key::Backspace => {
                    if name.pop().is_some() {
                        driver.delete_char_at(row, PROMPT.len() + name.len())?;
                    }
                }
                Key::Char(ch) if is_printable(ch) => {
                    name.push(ch);
                    driver.write_at(row, PROMPT.len() + name.len() - 1, &ch.to_string())?;
                }
                _ => {}
            }
            driver.move_cursor(row, PROMPT.len() + name.len())?;
            driver.flush()?;
        }
        Ok(())
    }
}
