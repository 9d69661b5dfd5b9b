use super::types::{visual_col, visual_width};
use super::App;

impl App {
    pub(crate) fn line_len(&self, row: usize) -> usize {
        self.lines
            .get(row)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    pub(crate) fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor_row)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Moves the cursor by a signed delta and re-establishes every cursor
    /// invariant: row clamped to the document, column clamped to the target
    /// line, and the wrap policy for runs past either end of a line. A
    /// negative column lands on the end of the previous line; a column past
    /// the line end lands on column 0, advancing the row when a next line
    /// exists.
    pub(crate) fn move_cursor(&mut self, dx: isize, dy: isize) {
        let mut nx = self.cursor_col as isize + dx;
        let mut ny = self.cursor_row as isize + dy;
        let last = self.lines.len() as isize - 1;

        if ny < 0 {
            ny = 0;
        } else if ny > last {
            ny = last;
        }

        if ny != self.cursor_row as isize {
            nx = nx.min(self.line_len(ny as usize) as isize);
        }

        if nx < 0 {
            if ny > 0 {
                ny -= 1;
                nx = self.line_len(ny as usize) as isize;
            } else {
                nx = 0;
            }
        } else if nx > self.line_len(ny as usize) as isize {
            nx = 0;
            if ny < last {
                ny += 1;
            }
        }

        self.cursor_col = nx as usize;
        self.cursor_row = ny as usize;
        self.scroll_to_fit();
    }

    /// Shifts the viewport by the minimal delta in each axis so the cursor's
    /// visual position is inside the visible rectangle.
    pub(crate) fn scroll_to_fit(&mut self) {
        if self.text_width == 0 || self.text_height == 0 {
            return;
        }

        let vx = visual_col(self.current_line(), self.cursor_col, self.config.tab_width);
        if vx < self.scroll_col {
            self.scroll_left(self.scroll_col - vx);
        } else if vx >= self.scroll_col + self.text_width {
            self.scroll_right(vx - (self.scroll_col + self.text_width) + 1);
        }

        if self.cursor_row < self.scroll_row {
            self.scroll_up(self.scroll_row - self.cursor_row);
        } else if self.cursor_row >= self.scroll_row + self.text_height {
            self.scroll_down(self.cursor_row - (self.scroll_row + self.text_height) + 1);
        }
    }

    fn scroll_up(&mut self, d: usize) {
        if self.scroll_row >= d {
            self.scroll_row -= d;
        }
    }

    fn scroll_down(&mut self, d: usize) {
        if self.scroll_row + d < self.lines.len() {
            self.scroll_row += d;
        }
    }

    fn scroll_left(&mut self, d: usize) {
        if self.scroll_col >= d {
            self.scroll_col -= d;
        } else {
            self.scroll_col = 0;
        }
    }

    /// Rightward scroll never goes past the widest currently visible line.
    fn scroll_right(&mut self, d: usize) {
        let mut max_width = 0;
        for i in 0..self.text_height {
            let row = self.scroll_row + i;
            if row >= self.lines.len() {
                break;
            }
            max_width = max_width.max(visual_width(&self.lines[row], self.config.tab_width));
        }

        if self.scroll_col + d < max_width {
            self.scroll_col += d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::Config;
    use super::*;

    fn app_with(lines: &[&str], width: usize, height: usize) -> App {
        let mut app = App::new(Config::default());
        app.lines = lines.iter().map(|s| s.to_string()).collect();
        app.text_width = width;
        app.text_height = height;
        app
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let mut app = app_with(&["abc", "de"], 80, 24);
        app.cursor_row = 1;
        app.move_cursor(-1, 0);
        assert_eq!((app.cursor_col, app.cursor_row), (3, 0));
    }

    #[test]
    fn past_line_end_wraps_to_next_line_start() {
        let mut app = app_with(&["abc", "de"], 80, 24);
        app.cursor_col = 3;
        app.move_cursor(1, 0);
        assert_eq!((app.cursor_col, app.cursor_row), (0, 1));
    }

    #[test]
    fn past_end_on_last_line_lands_on_column_zero() {
        let mut app = app_with(&["abc"], 80, 24);
        app.cursor_col = 3;
        app.move_cursor(1, 0);
        assert_eq!((app.cursor_col, app.cursor_row), (0, 0));
    }

    #[test]
    fn row_change_clamps_column_to_new_line() {
        let mut app = app_with(&["long line", "ab"], 80, 24);
        app.cursor_col = 7;
        app.move_cursor(0, 1);
        assert_eq!((app.cursor_col, app.cursor_row), (2, 1));
    }

    #[test]
    fn row_is_clamped_to_document() {
        let mut app = app_with(&["a", "b"], 80, 24);
        app.move_cursor(0, 10);
        assert_eq!(app.cursor_row, 1);
        app.move_cursor(0, -10);
        assert_eq!(app.cursor_row, 0);
    }

    #[test]
    fn cursor_stays_visible_after_moves() {
        let lines: Vec<String> = (0..40).map(|i| format!("line-{i:03}-{}", "x".repeat(30))).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut app = app_with(&refs, 10, 5);

        for _ in 0..25 {
            app.move_cursor(0, 1);
        }
        assert!(app.cursor_row >= app.scroll_row);
        assert!(app.cursor_row < app.scroll_row + app.text_height);

        for _ in 0..20 {
            app.move_cursor(1, 0);
        }
        let vx = visual_col(app.current_line(), app.cursor_col, 4);
        assert!(vx >= app.scroll_col);
        assert!(vx < app.scroll_col + app.text_width);

        for _ in 0..25 {
            app.move_cursor(0, -1);
        }
        assert!(app.cursor_row >= app.scroll_row);
    }

    #[test]
    fn vertical_scroll_stops_at_buffer_end() {
        let mut app = app_with(&["a", "b", "c"], 80, 2);
        app.cursor_row = 2;
        app.scroll_to_fit();
        assert_eq!(app.scroll_row, 1);
        // No further scroll possible even if requested.
        app.scroll_to_fit();
        assert_eq!(app.scroll_row, 1);
    }

    #[test]
    fn horizontal_scroll_clamped_to_widest_visible_line() {
        let mut app = app_with(&["short", "x"], 4, 24);
        app.cursor_col = 5;
        app.scroll_to_fit();
        // "short" is 5 wide; the viewport cannot scroll past it.
        assert!(app.scroll_col + 1 <= 5);
    }

    #[test]
    fn scroll_accounts_for_tab_expansion() {
        let mut app = app_with(&["\t\tabc"], 8, 24);
        app.cursor_col = 2;
        app.scroll_to_fit();
        let vx = visual_col(app.current_line(), app.cursor_col, 4);
        assert_eq!(vx, 8);
        assert!(vx >= app.scroll_col && vx < app.scroll_col + app.text_width);
    }
}
