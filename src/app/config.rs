use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::style::Color;
use serde::Deserialize;

/// Settings after defaults and any `melt.toml` overrides are applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub tab_width: usize,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: 4,
            status_fg: Color::Black,
            status_bg: Color::White,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    tab_width: Option<usize>,
    status_fg: Option<String>,
    status_bg: Option<String>,
}

/// Loads the first config file found among the candidate paths. No file at
/// all is not an error; an unreadable or unparsable file is, so the caller
/// can surface it on the message line.
pub fn load_config() -> Result<Config> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    candidates.push(PathBuf::from("melt.toml"));
    candidates.push(PathBuf::from(".melt.toml"));
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(PathBuf::from(home).join(".config/melt/config.toml"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        let file_cfg: FileConfig = toml::from_str(&content)?;
        return Ok(apply_overrides(file_cfg));
    }
    Ok(Config::default())
}

fn apply_overrides(file_cfg: FileConfig) -> Config {
    let mut cfg = Config::default();
    if let Some(width) = file_cfg.tab_width {
        if width > 0 {
            cfg.tab_width = width;
        }
    }
    if let Some(color) = file_cfg.status_fg.as_deref().and_then(parse_color) {
        cfg.status_fg = color;
    }
    if let Some(color) = file_cfg.status_bg.as_deref().and_then(parse_color) {
        cfg.status_bg = color;
    }
    cfg
}

fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}
