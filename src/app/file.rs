use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

use super::types::FileState;
use super::App;

const MAX_FILENAME_LEN: usize = 255;
const INVALID_CHARS: &str = "<>:\"/\\|?*";
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reads a file into document lines. An existing but empty file still yields
/// a single empty line.
pub(crate) fn load_lines(name: &str) -> Result<Vec<String>> {
    if name.is_empty() {
        return Err(anyhow!("Empty filename!"));
    }
    let content = fs::read_to_string(name)
        .map_err(|_| anyhow!("Failed to open {} for reading!", name))?;
    let mut lines: Vec<String> = content.lines().map(|s| s.to_string()).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}

/// Writes every line followed by a newline.
pub(crate) fn save_lines(name: &str, lines: &[String]) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("Empty filename!"));
    }
    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(name, content).map_err(|_| anyhow!("Failed to open {} for writing!", name))
}

/// Portable filename check: length, edge whitespace/periods, control and
/// shell-hostile characters, and Windows device names (case-insensitive,
/// with or without an extension).
pub(crate) fn valid_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FILENAME_LEN {
        return false;
    }
    if name.starts_with(' ') || name.ends_with(' ') || name.ends_with('.') {
        return false;
    }
    if name.chars().any(|c| (c as u32) < 32 || INVALID_CHARS.contains(c)) {
        return false;
    }

    let stem = name.split('.').next().unwrap_or(name);
    let upper = stem.to_ascii_uppercase();
    !RESERVED_NAMES.contains(&upper.as_str())
}

impl App {
    /// Applies the startup filename argument: load it if it exists, keep it
    /// as a pre-assigned new file if it does not, and fall back to an
    /// untitled buffer (with the reason on the message line) on anything
    /// else.
    pub(crate) fn open_initial(&mut self, name: &str) {
        self.file_name = name.to_string();
        self.file_state = FileState::Clean;

        if name.is_empty() {
            self.fall_back(String::new());
        } else if !valid_filename(name) {
            self.fall_back("Invalid filename!".to_string());
        } else if !Path::new(name).exists() {
            self.file_state = FileState::Unset;
        } else {
            match load_lines(name) {
                Ok(lines) => self.lines = lines,
                Err(e) => self.fall_back(e.to_string()),
            }
        }
    }

    fn fall_back(&mut self, msg: String) {
        self.file_name.clear();
        self.file_state = FileState::Unset;
        self.status_message = msg;
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::Config;
    use super::*;

    fn temp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("melt-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn rejects_reserved_and_malformed_names() {
        assert!(!valid_filename("CON"));
        assert!(!valid_filename("con.txt"));
        assert!(!valid_filename("lpt9"));
        assert!(!valid_filename("a/b"));
        assert!(!valid_filename("a\\b"));
        assert!(!valid_filename("what?"));
        assert!(!valid_filename(" lead"));
        assert!(!valid_filename("trail "));
        assert!(!valid_filename("dot."));
        assert!(!valid_filename(""));
        assert!(!valid_filename(&"x".repeat(256)));
        assert!(!valid_filename("bad\x07name"));
    }

    #[test]
    fn accepts_ordinary_names() {
        assert!(valid_filename("notes.txt"));
        assert!(valid_filename("CONTACTS.md"));
        assert!(valid_filename("a.b.c"));
        assert!(valid_filename(&"x".repeat(255)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let name = path.to_string_lossy().to_string();
        // The validator rejects path separators, so exercise I/O directly.
        let lines = vec!["alpha".to_string(), String::new(), "\tbeta".to_string()];
        save_lines(&name, &lines).unwrap();
        assert_eq!(load_lines(&name).unwrap(), lines);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_file_loads_as_single_empty_line() {
        let path = temp_path("empty");
        let name = path.to_string_lossy().to_string();
        std::fs::write(&path, "").unwrap();
        assert_eq!(load_lines(&name).unwrap(), vec![String::new()]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_lines("definitely-not-here.melt").unwrap_err();
        assert!(err.to_string().contains("for reading"));
        assert_eq!(load_lines("").unwrap_err().to_string(), "Empty filename!");
    }

    #[test]
    fn startup_with_missing_file_preassigns_the_name() {
        let mut app = App::new(Config::default());
        app.open_initial("fresh-notes.txt");
        assert_eq!(app.file_name, "fresh-notes.txt");
        assert_eq!(app.file_state, FileState::Unset);
        assert_eq!(app.lines, vec![String::new()]);
    }

    #[test]
    fn startup_with_invalid_name_falls_back_to_untitled() {
        let mut app = App::new(Config::default());
        app.open_initial("nope?");
        assert!(app.file_name.is_empty());
        assert_eq!(app.file_state, FileState::Unset);
        assert_eq!(app.status_message, "Invalid filename!");
    }
}
