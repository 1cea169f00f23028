mod app;
mod circuit;
mod config;
mod error;
mod format;
mod input;
mod telemetry;

use anyhow::{Context, Result};
use app::App;
use config::Config;
use format::FixedFormat;
use input::Console;
use std::io;
use tracing::debug;

fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::load().context("Failed to load settings")?;
    debug!(?config, "settings loaded");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock()).with_zero_epsilon(config.zero_epsilon);
    let mut app = App::new(console, FixedFormat::new(config.precision));

    // Closed input ends the session with a non-zero status.
    app.run()?;
    Ok(())
}
