use thiserror::Error;

pub use thirtyfour::error::{WebDriverError, WebDriverResult};

pub type UiResult<T> = Result<T, UiError>;

/// Failures of the element helpers and the scenario around them.
///
/// Protocol errors from the WebDriver server are kept as they are in
/// [`UiError::WebDriver`].
#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    WebDriver(#[from] WebDriverError),

    /// The element could not be found after every lookup attempt.
    #[error("Could not find element: {0}")]
    NotFound(String),
    /// An explicit wait ran out of time.
    #[error("Timed out: {0}")]
    Timeout(String),
    /// A click or type action exhausted its retries.
    #[error("{action} failed on: {locator}")]
    ActionFailed { action: &'static str, locator: String },

    #[error("driver process error: {0}")]
    DriverProcess(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl UiError {
    /// True for both the protocol-level "no such element" and the retried `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UiError::NotFound(_) | UiError::WebDriver(WebDriverError::NoSuchElement(_)))
    }

    pub fn is_click_intercepted(&self) -> bool {
        matches!(self, UiError::WebDriver(WebDriverError::ElementClickIntercepted(_)))
    }
}
