use std::fs::OpenOptions;
use std::io::Write;

use chrono::Local;

pub fn timestamp_prefix() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Appends a line to the file named by `MELT_LOG`. A raw-mode terminal has
/// no usable stderr, so this is the only debug channel; it stays silent
/// unless the variable is set.
pub fn log(message: &str) {
    let Ok(path) = std::env::var("MELT_LOG") else {
        return;
    };
    if path.is_empty() {
        return;
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "[{}] {}", timestamp_prefix(), message);
    }
}
