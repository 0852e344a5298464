use std::thread;
use std::time::{Duration, Instant};

pub use thirtyfour::query::ElementPoller;

use crate::http::connection_sync::WebDriverHttpClientSync;
use crate::GenericWebDriver;

/// Interval between polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default wait used by explicit waits.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// The poller every new session starts with.
pub fn default_poller() -> ElementPoller {
    ElementPoller::TimeoutWithInterval(DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL)
}

pub struct ElementPollerTicker {
    timeout: Option<Duration>,
    interval: Option<Duration>,
    min_tries: u32,
    start: Instant,
    cur_tries: u32,
}

impl ElementPollerTicker {
    pub fn new(poller: ElementPoller) -> Self {
        let mut ticker = Self {
            timeout: None,
            interval: None,
            min_tries: 0,
            start: Instant::now(),
            cur_tries: 0,
        };

        match poller {
            ElementPoller::NoWait => {}
            ElementPoller::TimeoutWithInterval(timeout, interval) => {
                ticker.timeout = Some(timeout);
                ticker.interval = Some(interval);
            }
            ElementPoller::NumTriesWithInterval(num_tries, interval) => {
                ticker.interval = Some(interval);
                ticker.min_tries = num_tries;
            }
            ElementPoller::TimeoutWithIntervalAndMinTries(timeout, interval, num_tries) => {
                ticker.timeout = Some(timeout);
                ticker.interval = Some(interval);
                ticker.min_tries = num_tries
            }
        }

        ticker
    }

    /// Record one completed poll. Returns false once the poller is exhausted,
    /// otherwise sleeps until the next poll is due and returns true.
    pub fn tick(&mut self) -> bool {
        self.cur_tries += 1;

        if self.timeout.filter(|t| &self.start.elapsed() < t).is_none()
            && self.cur_tries >= self.min_tries
        {
            return false;
        }

        if let Some(i) = self.interval {
            // Next poll is due no earlier than this long after the first poll started.
            let minimum_elapsed = i * self.cur_tries;
            let actual_elapsed = self.start.elapsed();

            if actual_elapsed < minimum_elapsed {
                thread::sleep(minimum_elapsed - actual_elapsed);
            }
        }

        true
    }
}

impl<T: 'static> GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    pub fn set_query_poller(&mut self, poller: ElementPoller) {
        self.config_mut().query_poller = poller;
    }
}
