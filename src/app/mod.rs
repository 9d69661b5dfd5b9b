mod command;
mod config;
mod edit;
mod file;
mod input;
mod motion;
mod types;

pub use config::{load_config, Config};
pub use input::handle_key;
pub use types::{expand_tabs, visual_col, visual_width, App, FileState, Mode};
