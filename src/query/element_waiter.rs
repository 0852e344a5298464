use std::time::Duration;

use thirtyfour::By;

use crate::errors::{WebDriverError, WebDriverResult};
use crate::query::{ElementPoller, ElementPollerTicker, DEFAULT_POLL_INTERVAL};
use crate::session::WebDriverSession;
use crate::webdrivercommands::{locator_value, WebDriverCommands};
use crate::webelement::WebElement;

/// Explicit wait for an element located by `By`, using the builder pattern.
///
/// "No such element" and "stale element" errors while polling just mean the
/// condition is not met yet. Any other error ends the wait.
///
/// # Example:
/// ```ignore
/// use formcheck::prelude::*;
///
/// let elem = driver
///     .wait_until(By::Id("result"))
///     .with_timeout(Duration::from_secs(10))
///     .displayed()?;
/// ```
#[derive(Debug)]
pub struct ElementWaiter<'a> {
    session: &'a WebDriverSession,
    by: By<'a>,
    poller: ElementPoller,
}

impl<'a> ElementWaiter<'a> {
    pub(crate) fn new(session: &'a WebDriverSession, by: By<'a>, poller: ElementPoller) -> Self {
        Self {
            session,
            by,
            poller,
        }
    }

    /// Use the specified ElementPoller for this ElementWaiter.
    /// This will not affect the default ElementPoller used for other waits.
    pub fn with_poller(mut self, poller: ElementPoller) -> Self {
        self.poller = poller;
        self
    }

    /// Wait up to `timeout`, keeping the configured poll interval.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let interval = match self.poller {
            ElementPoller::TimeoutWithInterval(_, i)
            | ElementPoller::NumTriesWithInterval(_, i)
            | ElementPoller::TimeoutWithIntervalAndMinTries(_, i, _) => i,
            ElementPoller::NoWait => DEFAULT_POLL_INTERVAL,
        };
        self.with_poller(ElementPoller::TimeoutWithInterval(timeout, interval))
    }

    /// Wait until the element is present in the DOM.
    pub fn present(self) -> WebDriverResult<WebElement<'a>> {
        self.run_poller(false)
    }

    /// Wait until the element is present and displayed.
    pub fn displayed(self) -> WebDriverResult<WebElement<'a>> {
        self.run_poller(true)
    }

    fn check(&self, visible: bool) -> WebDriverResult<Option<WebElement<'a>>> {
        let elem = self.session.find_element(self.by.clone())?;
        if visible && !elem.is_displayed()? {
            return Ok(None);
        }
        Ok(Some(elem))
    }

    fn run_poller(self, visible: bool) -> WebDriverResult<WebElement<'a>> {
        let mut ticker = ElementPollerTicker::new(self.poller.clone());
        loop {
            match self.check(visible) {
                Ok(Some(elem)) => return Ok(elem),
                Ok(None) => {}
                Err(WebDriverError::NoSuchElement(_))
                | Err(WebDriverError::StaleElementReference(_)) => {}
                Err(e) => return Err(e),
            }

            if !ticker.tick() {
                let condition = if visible { "visible" } else { "present" };
                return Err(WebDriverError::Timeout(format!(
                    "element '{}' was not {} in time",
                    locator_value(&self.by),
                    condition
                )));
            }
        }
    }
}
