mod app;
mod logging;
mod term;
mod ui;

use anyhow::Result;

use app::{handle_key, load_config, App, Config};
use term::{CrosstermDriver, TerminalDriver};

fn main() -> Result<()> {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(format!("Config error: {e}"))),
    };

    let mut app = App::new(config);
    if let Some(name) = std::env::args().nth(1) {
        app.open_initial(&name);
    }
    if app.status_message.is_empty() {
        if let Some(msg) = config_error {
            app.status_message = msg;
        }
    }

    logging::log("session start");
    let mut driver = CrosstermDriver::enter()?;
    let result = run(&mut app, &mut driver);
    drop(driver);
    logging::log("session end");
    result
}

/// One input event is fully processed per iteration: frame rebuild, diff
/// paint, then the blocking wait for the next key. The only exits are the
/// quit commands and the two fatal terminal conditions.
fn run(app: &mut App, driver: &mut dyn TerminalDriver) -> Result<()> {
    while app.running {
        ui::update(app, driver)?;
        ui::render(app, driver)?;
        let key = driver.read_key()?;
        handle_key(app, key, driver)?;
    }
    Ok(())
}
