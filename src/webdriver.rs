use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use log::error;
use serde::Serialize;
use serde_json::Value;
use thirtyfour::common::command::Command;
use thirtyfour::common::config::WebDriverConfig;

use crate::errors::WebDriverResult;
use crate::http::connection_sync::{HttpClientCreateParams, WebDriverHttpClientSync};
use crate::http::reqwest_sync::ReqwestDriverSync;
use crate::session::WebDriverSession;
use crate::webdrivercommands::{start_session, WebDriverCommands};

/// The WebDriver struct represents a browser session.
///
/// For the browser-level methods, see the
/// [WebDriverCommands](trait.WebDriverCommands.html) trait.
pub type WebDriver = GenericWebDriver<ReqwestDriverSync>;

/// A synchronous WebDriver browser session over some HTTP client `T`.
///
/// The session is ended exactly once: by [`quit`](GenericWebDriver::quit),
/// or, if that never happens, when the driver is dropped.
#[derive(Debug)]
pub struct GenericWebDriver<T: WebDriverHttpClientSync> {
    pub session: WebDriverSession,
    capabilities: Value,
    quit_on_drop: bool,
    phantom: PhantomData<T>,
}

impl<T: 'static> GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    /// Connect to the WebDriver server at `server_url` and start a new session.
    ///
    /// `timeout` applies to every HTTP request, including session creation.
    /// `None` keeps the client's default.
    pub fn new_with_timeout<C>(
        server_url: &str,
        capabilities: C,
        timeout: Option<Duration>,
    ) -> WebDriverResult<Self>
    where
        C: Serialize,
    {
        let params = HttpClientCreateParams {
            server_url: server_url.to_string(),
            timeout,
        };
        let conn = T::create(params)?;
        Self::with_client(conn, capabilities)
    }

    /// Start a new session over an already-built client.
    pub fn with_client<C>(conn: T, capabilities: C) -> WebDriverResult<Self>
    where
        C: Serialize,
    {
        let (session_id, session_capabilities) = start_session(&conn, capabilities)?;

        Ok(GenericWebDriver {
            session: WebDriverSession::new(session_id, Arc::new(conn)),
            capabilities: session_capabilities,
            quit_on_drop: true,
            phantom: PhantomData,
        })
    }

    /// Capabilities as returned by the server.
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    pub fn config_mut(&mut self) -> &mut WebDriverConfig {
        self.session.config_mut()
    }

    /// End the webdriver session.
    pub fn quit(mut self) -> WebDriverResult<()> {
        self.quit_on_drop = false;
        self.cmd(Command::DeleteSession)?;
        Ok(())
    }
}

impl<T> WebDriverCommands for GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    fn session(&self) -> &WebDriverSession {
        &self.session
    }
}

impl<T> Drop for GenericWebDriver<T>
where
    T: WebDriverHttpClientSync,
{
    /// Close the session if it was not quit explicitly.
    fn drop(&mut self) {
        if self.quit_on_drop {
            if let Err(e) = self.cmd(Command::DeleteSession) {
                error!("Failed to close session: {:?}", e);
            }
        }
    }
}
