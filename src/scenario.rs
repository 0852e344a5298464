//! The contact form scenario.

use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use thirtyfour::By;

use crate::actions::{UiActions, Verdict};
use crate::errors::{UiError, UiResult};
use crate::http::connection_sync::WebDriverHttpClientSync;
use crate::logger::TestLogger;
use crate::query::{ElementPoller, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::retry::RetryPolicy;
use crate::service::BrowserLauncher;
use crate::webdriver::GenericWebDriver;
use crate::webdrivercommands::WebDriverCommands;

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const SUBMIT_BUTTON: &str = "submit-btn";
pub const RESULT_TEXT: &str = "result";

pub const ERROR_MARKER: &str = "TEST ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    NotStarted,
    BrowserStarted,
    Navigated,
    FormFilled,
    Submitted,
    Verified,
    Closed,
    Error,
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScenarioState::NotStarted => "not started",
            ScenarioState::BrowserStarted => "browser started",
            ScenarioState::Navigated => "navigated",
            ScenarioState::FormFilled => "form filled",
            ScenarioState::Submitted => "submitted",
            ScenarioState::Verified => "verified",
            ScenarioState::Closed => "closed",
            ScenarioState::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Page under test.
    pub page: PathBuf,
    pub expected_title: String,
    pub name: String,
    pub email: String,
    /// Used by both the click and the type helpers.
    pub retry: RetryPolicy,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            page: Path::new(env!("CARGO_MANIFEST_DIR")).join("index.html"),
            expected_title: "Test page wrong".to_string(),
            name: "Oliver Twist".to_string(),
            email: "oliver@twist.com".to_string(),
            retry: RetryPolicy::default(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ScenarioConfig {
    /// The confirmation the page should show after a successful submit.
    pub fn expected_response(&self) -> String {
        format!("Thank you, {}! We'll contact you at {}.", self.name, self.email)
    }
}

/// How far a run got and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Last step completed before the run ended or failed.
    pub reached: ScenarioState,
    /// `Closed` after a clean run, `Error` if any step failed.
    pub state: ScenarioState,
    pub verdict: Option<Verdict>,
    pub error: Option<String>,
    /// Whether the browser session was shut down cleanly.
    pub browser_closed: bool,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.verdict.as_ref().map_or(false, Verdict::passed)
    }
}

#[derive(Debug)]
pub struct FormScenario {
    config: ScenarioConfig,
}

impl FormScenario {
    pub fn new(config: ScenarioConfig) -> Self {
        FormScenario { config }
    }

    /// Run the scenario once.
    ///
    /// Step failures are reported through `logger` and in the outcome, never
    /// returned. Once the browser has started, its session is closed exactly
    /// once on every path. The only error returned is a failure to write the log.
    pub fn run<L: BrowserLauncher>(
        &self,
        launcher: &mut L,
        logger: &TestLogger,
    ) -> io::Result<ScenarioOutcome> {
        let mut driver = match launcher.launch() {
            Ok(driver) => driver,
            Err(e) => {
                report_error(logger, &e)?;
                return Ok(ScenarioOutcome {
                    reached: ScenarioState::NotStarted,
                    state: ScenarioState::Error,
                    verdict: None,
                    error: Some(e.to_string()),
                    browser_closed: false,
                });
            }
        };
        driver.set_query_poller(ElementPoller::TimeoutWithInterval(
            self.config.wait_timeout,
            self.config.poll_interval,
        ));

        let mut reached = ScenarioState::BrowserStarted;
        let mut verdict = None;
        let error = match self.steps(&driver, logger, &mut reached, &mut verdict) {
            Ok(()) => None,
            Err(e) => {
                report_error(logger, &e)?;
                Some(e.to_string())
            }
        };

        let browser_closed = match driver.quit() {
            Ok(()) => {
                logger.info("Browser closed")?;
                true
            }
            Err(e) => {
                logger.error(&format!("Failed to close browser: {}", e))?;
                false
            }
        };

        Ok(ScenarioOutcome {
            reached,
            state: if error.is_some() { ScenarioState::Error } else { ScenarioState::Closed },
            verdict,
            error,
            browser_closed,
        })
    }

    fn steps<T>(
        &self,
        driver: &GenericWebDriver<T>,
        logger: &TestLogger,
        reached: &mut ScenarioState,
        verdict: &mut Option<Verdict>,
    ) -> UiResult<()>
    where
        T: WebDriverHttpClientSync + 'static,
    {
        let cfg = &self.config;
        logger.info("Browser started successfully")?;

        let url = file_url(&cfg.page)?;
        driver.get(&url)?;
        logger.info(&format!("Navigated to {}", url))?;
        *reached = ScenarioState::Navigated;

        // A wrong title is only worth a warning.
        let title = driver.title()?;
        if title != cfg.expected_title {
            logger.warning(&format!(
                "Page title mismatch. Expected: '{}', Got: '{}'",
                cfg.expected_title, title
            ))?;
        } else {
            logger.info("Page title is correct")?;
        }

        let ui = UiActions::new(driver, logger);
        ui.type_text(By::Id(NAME_FIELD), &cfg.name, &cfg.retry)?;
        ui.type_text(By::Id(EMAIL_FIELD), &cfg.email, &cfg.retry)?;
        *reached = ScenarioState::FormFilled;

        ui.click(By::Id(SUBMIT_BUTTON), &cfg.retry)?;
        *reached = ScenarioState::Submitted;

        let expected = cfg.expected_response();
        *verdict = Some(ui.verify_text(By::Id(RESULT_TEXT), &expected, cfg.wait_timeout)?);
        *reached = ScenarioState::Verified;
        Ok(())
    }
}

fn report_error(logger: &TestLogger, e: &UiError) -> io::Result<()> {
    logger.error(&format!("Test failed with error: {}", e))?;
    logger.marker(&format!("{}: {}", ERROR_MARKER, e))
}

/// `file://` URL for a local page. Relative paths are taken from the working directory.
pub fn file_url(path: &Path) -> UiResult<String> {
    let abs = if path.is_absolute() { path.to_path_buf() } else { env::current_dir()?.join(path) };
    Url::from_file_path(&abs)
        .map(String::from)
        .map_err(|_| UiError::InvalidUrl(abs.display().to_string()))
}
