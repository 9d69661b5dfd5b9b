use anyhow::{bail, Result};

use crate::app::{expand_tabs, visual_col, App, FileState};
use crate::term::TerminalDriver;

/// The text area keeps the bottom two rows for the status bar and the
/// message line.
const CHROME_ROWS: usize = 2;
const MIN_TEXT_WIDTH: usize = 40;
const MIN_TEXT_HEIGHT: usize = 12;

/// Rebuilds the pending frame from the document and viewport. Picks up
/// terminal resizes first; a terminal too small to hold the UI is fatal.
pub fn update(app: &mut App, driver: &mut dyn TerminalDriver) -> Result<()> {
    let (width, height) = driver.dimensions()?;
    if width != app.term_width || height != app.term_height {
        app.term_width = width;
        app.term_height = height;
        app.text_width = width;
        app.text_height = height.saturating_sub(CHROME_ROWS);

        if app.text_width < MIN_TEXT_WIDTH || app.text_height < MIN_TEXT_HEIGHT {
            bail!("Terminal size too small!");
        }

        app.pending = vec![" ".repeat(app.text_width); app.text_height];
        app.shown = vec![" ".repeat(app.text_width); app.text_height];
        app.size_changed = true;
    }

    for i in 0..app.text_height {
        let row = app.scroll_row + i;
        app.pending[i] = match app.lines.get(row) {
            Some(line) => visible_slice(line, app.scroll_col, app.text_width, app.config.tab_width),
            None => filler_row(app.text_width),
        };
    }

    app.status_bar = status_line(app);
    Ok(())
}

/// Paints the frame. After a resize every row is repainted; otherwise only
/// rows that differ from what is on screen. The status bar and message line
/// are single rows and always rewritten. The cursor is hidden for the
/// duration so it never flashes at a stale position.
pub fn render(app: &mut App, driver: &mut dyn TerminalDriver) -> Result<()> {
    driver.set_cursor_visible(false)?;

    if app.size_changed {
        app.shown.clone_from(&app.pending);
        for (i, row) in app.shown.iter().enumerate() {
            driver.write_row(i, row)?;
        }
        app.size_changed = false;
    } else {
        if app.shown.len() != app.pending.len() {
            app.shown.resize(app.pending.len(), String::new());
        }
        for i in 0..app.pending.len() {
            if app.shown[i] != app.pending[i] {
                app.shown[i] = app.pending[i].clone();
                driver.write_row(i, &app.shown[i])?;
            }
        }
    }

    driver.write_row_styled(
        app.term_height.saturating_sub(2),
        &app.status_bar,
        app.config.status_fg,
        app.config.status_bg,
    )?;
    driver.write_row(
        app.term_height.saturating_sub(1),
        &fit_width(&app.status_message, app.term_width),
    )?;

    let vx = visual_col(app.current_line(), app.cursor_col, app.config.tab_width);
    driver.move_cursor(
        app.cursor_row.saturating_sub(app.scroll_row),
        vx.saturating_sub(app.scroll_col),
    )?;
    driver.set_cursor_visible(true)?;
    driver.flush()
}

/// Tab-expands a line and takes the horizontal viewport slice, padded with
/// spaces to exactly the viewport width.
fn visible_slice(line: &str, x_offset: usize, width: usize, tab_width: usize) -> String {
    let expanded = expand_tabs(line, tab_width);
    let mut vis = String::with_capacity(width);
    let mut cells = 0;
    for ch in expanded.chars().skip(x_offset).take(width) {
        vis.push(ch);
        cells += 1;
    }
    for _ in cells..width {
        vis.push(' ');
    }
    vis
}

/// Rows past the end of the document show a lone `~` marker.
fn filler_row(width: usize) -> String {
    let mut row = String::with_capacity(width);
    row.push('~');
    while row.len() < width {
        row.push(' ');
    }
    row
}

/// Left: display name (ellipsized past 23 characters, `[NEW FILE]` when
/// untitled, `[+]` when dirty). Right: 1-based cursor position. Padded to
/// exactly the terminal width.
fn status_line(app: &App) -> String {
    let display_name = if app.file_name.chars().count() >= 23 {
        let prefix: String = app.file_name.chars().take(20).collect();
        format!("{prefix}...")
    } else {
        app.file_name.clone()
    };
    let mut info = if display_name.is_empty() {
        "[NEW FILE]".to_string()
    } else {
        display_name
    };
    if app.file_state == FileState::Dirty {
        info.push_str("[+]");
    }

    let position = format!("Ln {}, Col {}", app.cursor_row + 1, app.cursor_col + 1);
    let pad = app
        .term_width
        .saturating_sub(info.chars().count() + position.len());
    let mut bar = info;
    for _ in 0..pad {
        bar.push(' ');
    }
    bar.push_str(&position);
    fit_width(&bar, app.term_width)
}

fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut cells = 0;
    for ch in text.chars().take(width) {
        out.push(ch);
        cells += 1;
    }
    for _ in cells..width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::term::ScriptedDriver;

    fn app_with(lines: &[&str]) -> App {
        let mut app = App::new(Config::default());
        app.lines = lines.iter().map(|s| s.to_string()).collect();
        app
    }

    #[test]
    fn first_update_adopts_dimensions_and_forces_full_repaint() {
        let mut app = app_with(&["hello"]);
        let mut driver = ScriptedDriver::new(60, 20);
        update(&mut app, &mut driver).unwrap();
        assert_eq!((app.text_width, app.text_height), (60, 18));
        assert!(app.size_changed);
        assert_eq!(app.pending.len(), 18);
        assert!(app.pending[0].starts_with("hello"));
        assert_eq!(app.pending[0].len(), 60);
        assert!(app.pending[5].starts_with('~'));
    }

    #[test]
    fn undersized_terminal_is_fatal() {
        let mut app = app_with(&[""]);
        let mut driver = ScriptedDriver::new(39, 20);
        assert!(update(&mut app, &mut driver).is_err());

        let mut app = app_with(&[""]);
        let mut driver = ScriptedDriver::new(80, 13);
        assert!(update(&mut app, &mut driver).is_err());

        let mut app = app_with(&[""]);
        let mut driver = ScriptedDriver::new(40, 14);
        assert!(update(&mut app, &mut driver).is_ok());
    }

    #[test]
    fn rows_render_through_the_tab_expanded_viewport_slice() {
        let mut app = app_with(&["\tabc"]);
        let mut driver = ScriptedDriver::new(60, 20);
        update(&mut app, &mut driver).unwrap();
        assert!(app.pending[0].starts_with("    abc"));

        app.scroll_col = 2;
        update(&mut app, &mut driver).unwrap();
        assert!(app.pending[0].starts_with("  abc"));
    }

    #[test]
    fn diff_repaints_only_changed_rows() {
        let mut app = app_with(&["one", "two", "three"]);
        let mut driver = ScriptedDriver::new(60, 20);
        update(&mut app, &mut driver).unwrap();
        render(&mut app, &mut driver).unwrap();
        assert!(!app.size_changed);

        app.lines[1] = "TWO".to_string();
        driver.writes.clear();
        update(&mut app, &mut driver).unwrap();
        render(&mut app, &mut driver).unwrap();

        // Row 1 plus the always-painted status bar and message line.
        assert_eq!(driver.rows_written(), vec![1, 18, 19]);
    }

    #[test]
    fn resize_repaints_every_row() {
        let mut app = app_with(&["one"]);
        let mut driver = ScriptedDriver::new(60, 20);
        update(&mut app, &mut driver).unwrap();
        render(&mut app, &mut driver).unwrap();

        driver.width = 70;
        driver.writes.clear();
        update(&mut app, &mut driver).unwrap();
        render(&mut app, &mut driver).unwrap();
        let text_rows = driver
            .rows_written()
            .iter()
            .filter(|&&r| r < 18)
            .count();
        assert_eq!(text_rows, 18);
        assert!(!app.size_changed);
    }

    #[test]
    fn status_bar_shows_new_file_and_position() {
        let mut app = app_with(&["abc"]);
        app.term_width = 60;
        app.cursor_col = 2;
        let bar = status_line(&app);
        assert_eq!(bar.len(), 60);
        assert!(bar.starts_with("[NEW FILE]"));
        assert!(bar.ends_with("Ln 1, Col 3"));
    }

    #[test]
    fn status_bar_marks_dirty_and_ellipsizes_long_names() {
        let mut app = app_with(&["abc"]);
        app.term_width = 60;
        app.file_name = "a-very-long-filename-that-keeps-going.txt".to_string();
        app.file_state = FileState::Dirty;
        let bar = status_line(&app);
        assert!(bar.starts_with("a-very-long-filename...[+]"));
    }

    #[test]
    fn short_names_are_not_ellipsized() {
        let mut app = app_with(&["abc"]);
        app.term_width = 60;
        app.file_name = "notes.txt".to_string();
        app.file_state = FileState::Clean;
        let bar = status_line(&app);
        assert!(bar.starts_with("notes.txt "));
    }

    #[test]
    fn cursor_lands_on_the_visual_column() {
        let mut app = app_with(&["\tab"]);
        let mut driver = ScriptedDriver::new(60, 20);
        update(&mut app, &mut driver).unwrap();
        app.cursor_col = 1;
        render(&mut app, &mut driver).unwrap();
        assert_eq!(driver.cursor, (0, 4));
        assert!(driver.cursor_visible);
    }

    #[test]
    fn message_line_is_padded_and_truncated() {
        assert_eq!(fit_width("hi", 5), "hi   ");
        assert_eq!(fit_width("toolong", 4), "tool");
    }
}
