use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

/// A keyboard event as the editor sees it. Everything the dispatch loop does
/// not recognize collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Tab,
    Esc,
    /// The terminal was resized; wakes the loop so the next tick picks up
    /// the new dimensions.
    Resize,
    Other,
}

/// The terminal surface the editor draws on. The state machine only ever
/// talks to this trait, so tests can drive it with a scripted double.
pub trait TerminalDriver {
    fn dimensions(&mut self) -> Result<(usize, usize)>;
    fn read_key(&mut self) -> Result<Key>;
    fn write_row(&mut self, row: usize, text: &str) -> Result<()>;
    fn write_row_styled(&mut self, row: usize, text: &str, fg: Color, bg: Color) -> Result<()>;
    fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()>;
    fn delete_char_at(&mut self, row: usize, col: usize) -> Result<()>;
    fn move_cursor(&mut self, row: usize, col: usize) -> Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// Crossterm-backed driver. Construction enters raw mode and the alternate
/// screen; both are restored on drop, so an early `?` return still leaves
/// the user's shell intact.
pub struct CrosstermDriver {
    out: io::Stdout,
}

impl CrosstermDriver {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, terminal::Clear(terminal::ClearType::All))?;
        Ok(Self { out })
    }
}

impl Drop for CrosstermDriver {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, ResetColor);
        let _ = disable_raw_mode();
        let _ = execute!(self.out, LeaveAlternateScreen);
    }
}

impl TerminalDriver for CrosstermDriver {
    fn dimensions(&mut self) -> Result<(usize, usize)> {
        let (w, h) = terminal::size()?;
        Ok((w as usize, h as usize))
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) => return Ok(map_key(key)),
                Event::Resize(_, _) => return Ok(Key::Resize),
                _ => {}
            }
        }
    }

    fn write_row(&mut self, row: usize, text: &str) -> Result<()> {
        queue!(self.out, MoveTo(0, row as u16), Print(text))?;
        Ok(())
    }

    fn write_row_styled(&mut self, row: usize, text: &str, fg: Color, bg: Color) -> Result<()> {
        queue!(
            self.out,
            MoveTo(0, row as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(text),
            ResetColor
        )?;
        Ok(())
    }

    fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        queue!(self.out, MoveTo(col as u16, row as u16), Print(text))?;
        Ok(())
    }

    fn delete_char_at(&mut self, row: usize, col: usize) -> Result<()> {
        queue!(
            self.out,
            MoveTo(col as u16, row as u16),
            Print(' '),
            MoveTo(col as u16, row as u16)
        )?;
        Ok(())
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        queue!(self.out, MoveTo(col as u16, row as u16))?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(self.out, Show)?;
        } else {
            queue!(self.out, Hide)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn map_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(ch)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            Key::Char(ch)
        }
        _ => Key::Other,
    }
}

/// In-memory driver for headless tests: replays a key script and records
/// every write so assertions can inspect what would have been painted.
#[cfg(test)]
pub(crate) struct ScriptedDriver {
    pub(crate) keys: std::collections::VecDeque<Key>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) writes: Vec<(usize, String)>,
    pub(crate) cursor: (usize, usize),
    pub(crate) cursor_visible: bool,
}

#[cfg(test)]
impl ScriptedDriver {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            keys: std::collections::VecDeque::new(),
            width,
            height,
            writes: Vec::new(),
            cursor: (0, 0),
            cursor_visible: true,
        }
    }

    pub(crate) fn script(mut self, keys: &[Key]) -> Self {
        self.keys.extend(keys.iter().copied());
        self
    }

    pub(crate) fn rows_written(&self) -> Vec<usize> {
        self.writes.iter().map(|(row, _)| *row).collect()
    }
}

#[cfg(test)]
impl TerminalDriver for ScriptedDriver {
    fn dimensions(&mut self) -> Result<(usize, usize)> {
        Ok((self.width, self.height))
    }

    fn read_key(&mut self) -> Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Esc))
    }

    fn write_row(&mut self, row: usize, text: &str) -> Result<()> {
        self.writes.push((row, text.to_string()));
        Ok(())
    }

    fn write_row_styled(&mut self, row: usize, text: &str, _fg: Color, _bg: Color) -> Result<()> {
        self.writes.push((row, text.to_string()));
        Ok(())
    }

    fn write_at(&mut self, row: usize, _col: usize, text: &str) -> Result<()> {
        self.writes.push((row, text.to_string()));
        Ok(())
    }

    fn delete_char_at(&mut self, row: usize, _col: usize) -> Result<()> {
        self.writes.push((row, String::new()));
        Ok(())
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        self.cursor = (row, col);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
