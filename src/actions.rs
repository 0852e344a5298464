//! Retrying element helpers and the text assertion used by the scenario.
//!
//! Every helper reports through the [`TestLogger`] it was built with.

use std::time::Duration;

use thirtyfour::By;

use crate::errors::{UiError, UiResult, WebDriverError};
use crate::logger::TestLogger;
use crate::retry::RetryPolicy;
use crate::webdrivercommands::{locator_value, WebDriverCommands};
use crate::webelement::WebElement;

pub const PASS_MARKER: &str = "TEST PASSED";
pub const FAIL_MARKER: &str = "TEST FAILED";

/// Result of comparing an element's text with the expected literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed { actual: String },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

pub struct UiActions<'a, D: WebDriverCommands> {
    driver: &'a D,
    logger: &'a TestLogger,
}

impl<'a, D: WebDriverCommands> UiActions<'a, D> {
    pub fn new(driver: &'a D, logger: &'a TestLogger) -> Self {
        UiActions { driver, logger }
    }

    /// Look up an element, retrying while it is absent.
    ///
    /// Fails with `NotFound` once `policy.max_attempts` lookups have missed.
    /// Any other error is returned at once.
    pub fn find_element(&self, by: By<'a>, policy: &RetryPolicy) -> UiResult<WebElement<'a>> {
        let driver = self.driver;
        let name = locator_value(&by);
        let attempts = policy.max_attempts.max(1);
        policy
            .run(
                |_| -> UiResult<WebElement<'a>> { Ok(driver.find_element(by.clone())?) },
                UiError::is_not_found,
                |attempt, _| {
                    self.logger.warning(&format!(
                        "Element '{}' not found (attempt {}/{})",
                        name, attempt, attempts
                    ))?;
                    Ok(())
                },
            )
            .map_err(|e| match e {
                e if e.is_not_found() => UiError::NotFound(name.to_string()),
                e => e,
            })
    }

    /// Block until the element is present (or present and displayed, if `visible`).
    pub fn wait_for(
        &self,
        by: By<'a>,
        timeout: Duration,
        visible: bool,
    ) -> UiResult<WebElement<'a>> {
        let name = locator_value(&by);
        let waiter = self.driver.wait_until(by).with_timeout(timeout);
        let res = if visible { waiter.displayed() } else { waiter.present() };
        match res {
            Ok(elem) => Ok(elem),
            Err(WebDriverError::Timeout(msg)) => {
                self.logger.error(&format!("Timed out waiting for '{}': {}", name, msg))?;
                Err(UiError::Timeout(msg))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Click an element, retrying while it is absent or another element
    /// receives the click.
    pub fn click(&self, by: By<'a>, policy: &RetryPolicy) -> UiResult<()> {
        let name = locator_value(&by);
        let attempts = policy.max_attempts.max(1);
        let retryable = |e: &UiError| e.is_not_found() || e.is_click_intercepted();
        let res = policy.run(
            |_| -> UiResult<()> {
                self.driver.find_element(by.clone())?.click()?;
                Ok(())
            },
            retryable,
            |attempt, e| {
                self.logger.warning(&format!(
                    "Click failed on '{}' (attempt {}/{}): {}",
                    name, attempt, attempts, e
                ))?;
                Ok(())
            },
        );

        match res {
            Ok(()) => {
                self.logger.info(&format!("Clicked on: {}", name))?;
                Ok(())
            }
            Err(e) if retryable(&e) => Err(UiError::ActionFailed {
                action: "Click",
                locator: name.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Replace the contents of an element with `text`, retrying while it is absent.
    pub fn type_text(&self, by: By<'a>, text: &str, policy: &RetryPolicy) -> UiResult<()> {
        let name = locator_value(&by);
        let attempts = policy.max_attempts.max(1);
        let res = policy.run(
            |_| -> UiResult<()> {
                let elem = self.driver.find_element(by.clone())?;
                elem.clear()?;
                elem.send_keys(text)?;
                Ok(())
            },
            UiError::is_not_found,
            |attempt, e| {
                self.logger.warning(&format!(
                    "Type failed on '{}' (attempt {}/{}): {}",
                    name, attempt, attempts, e
                ))?;
                Ok(())
            },
        );

        match res {
            Ok(()) => {
                self.logger.info(&format!("Typed '{}' into: {}", text, name))?;
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(UiError::ActionFailed {
                action: "Type",
                locator: name.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Wait for the element to be visible and compare its text with `expected`.
    ///
    /// A mismatch is reported, not raised. Only a timed-out wait is an error.
    pub fn verify_text(
        &self,
        by: By<'a>,
        expected: &str,
        timeout: Duration,
    ) -> UiResult<Verdict> {
        let name = locator_value(&by);
        let elem = match self.wait_for(by, timeout, true) {
            Ok(elem) => elem,
            Err(e @ UiError::Timeout(_)) => {
                self.logger.error(&format!("Element '{}' not found in time: {}", name, e))?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let actual = elem.text()?;
        if actual == expected {
            self.logger.info(&format!("Text matched for '{}': '{}'", name, expected))?;
            self.logger.marker(PASS_MARKER)?;
            Ok(Verdict::Passed)
        } else {
            self.logger.error(&format!(
                "Expected '{}' but got '{}' for '{}'",
                expected, actual, name
            ))?;
            self.logger.marker(FAIL_MARKER)?;
            Ok(Verdict::Failed { actual })
        }
    }
}
