//! Browser UI check for a local contact form, driven over Selenium / WebDriver.
//!
//! The crate carries a small synchronous WebDriver client on top of the
//! `thirtyfour` protocol types, a set of retrying element helpers built on it,
//! and one fixed scenario:
//!
//! 1. start Chrome through a local chromedriver,
//! 2. open `index.html` and check its title,
//! 3. type a name and an email address, click submit,
//! 4. verify the confirmation text.
//!
//! Progress is written to `test_log.txt` and echoed to standard output, along
//! with a `TEST PASSED`, `TEST FAILED` or `TEST ERROR: ...` marker.
//!
//! ## Example
//!
//! ```ignore
//! use formcheck::prelude::*;
//!
//! fn main() -> std::io::Result<()> {
//!     let logger = TestLogger::open("test_log.txt")?;
//!     let mut launcher = ChromeLauncher::default();
//!     let outcome = FormScenario::new(ScenarioConfig::default()).run(&mut launcher, &logger)?;
//!     println!("reached: {}", outcome.reached);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

/// Re-export the protocol types.
pub use thirtyfour::common::types::ElementId;
pub use thirtyfour::error;
pub use thirtyfour::{By, DesiredCapabilities, RequestData, RequestMethod, SessionId};

pub use errors::{UiError, UiResult};
pub use session::WebDriverSession;
pub use webdriver::{GenericWebDriver, WebDriver};
pub use webdrivercommands::WebDriverCommands;
pub use webelement::WebElement;

pub mod prelude {
    pub use crate::actions::{UiActions, Verdict};
    pub use crate::errors::{UiError, UiResult, WebDriverError, WebDriverResult};
    pub use crate::logger::TestLogger;
    pub use crate::retry::{Backoff, RetryPolicy};
    pub use crate::scenario::{FormScenario, ScenarioConfig, ScenarioOutcome, ScenarioState};
    pub use crate::service::{BrowserLauncher, ChromeLauncher};
    pub use crate::webdriver::WebDriver;
    pub use crate::webdrivercommands::WebDriverCommands;
    pub use crate::webelement::WebElement;
    pub use crate::{By, DesiredCapabilities};
}

pub mod actions;
pub mod errors;
pub mod http {
    pub mod connection_sync;
    pub mod reqwest_sync;
}
pub mod logger;
pub mod query;
pub mod retry;
pub mod scenario;
pub mod service;
mod session;
mod webdriver;
mod webdrivercommands;
mod webelement;
