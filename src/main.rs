//! Runs the contact form check once.
//!
//! Requires `chromedriver` and Chrome on `PATH`. The exit status does not
//! reflect the test result; read the marker on standard output or `test_log.txt`.

use formcheck::logger::DEFAULT_LOG_FILE;
use formcheck::prelude::*;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let logger = TestLogger::open(DEFAULT_LOG_FILE)?;
    let mut launcher = ChromeLauncher::default();
    FormScenario::new(ScenarioConfig::default()).run(&mut launcher, &logger)?;

    Ok(())
}
