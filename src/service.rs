//! Owning the local chromedriver process.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as Process, Stdio};
use std::time::Duration;

use log::{debug, info};
use thirtyfour::common::command::{Command, FormatRequestData};
use thirtyfour::DesiredCapabilities;

use crate::errors::{UiError, UiResult};
use crate::http::connection_sync::{HttpClientCreateParams, WebDriverHttpClientSync};
use crate::http::reqwest_sync::{ReqwestDriverSync, DEFAULT_REQUEST_TIMEOUT};
use crate::query::{ElementPoller, ElementPollerTicker};
use crate::webdriver::{GenericWebDriver, WebDriver};
use crate::webdrivercommands::no_session;

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);
const STATUS_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// A running chromedriver. The process is killed on drop.
#[derive(Debug)]
pub struct ChromeDriverService {
    child: Child,
    url: String,
}

impl ChromeDriverService {
    /// Spawn `driver_path` on a free local port and wait until `/status` reports ready.
    pub fn start(driver_path: &Path, startup_timeout: Duration) -> UiResult<Self> {
        let port = free_port()?;
        let child = Process::new(driver_path)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                UiError::DriverProcess(format!(
                    "failed to spawn {}: {}",
                    driver_path.display(),
                    e
                ))
            })?;
        info!("spawned {} (pid {}) on port {}", driver_path.display(), child.id(), port);

        let mut service = ChromeDriverService {
            child,
            url: format!("http://127.0.0.1:{}", port),
        };
        service.wait_ready(startup_timeout)?;
        Ok(service)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn wait_ready(&mut self, timeout: Duration) -> UiResult<()> {
        let conn = ReqwestDriverSync::create(HttpClientCreateParams {
            server_url: self.url.clone(),
            timeout: Some(STATUS_REQUEST_TIMEOUT),
        })?;
        let mut ticker =
            ElementPollerTicker::new(ElementPoller::TimeoutWithInterval(timeout, STATUS_POLL_INTERVAL));
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(UiError::DriverProcess(format!(
                    "chromedriver exited during startup ({})",
                    status
                )));
            }

            match conn.execute(Command::Status.format_request(&no_session())) {
                Ok(v) if v["value"]["ready"].as_bool().unwrap_or(false) => return Ok(()),
                Ok(_) => debug!("chromedriver not ready yet"),
                Err(e) => debug!("chromedriver status check failed: {}", e),
            }

            if !ticker.tick() {
                return Err(UiError::DriverProcess(format!(
                    "chromedriver was not ready within {:?}",
                    timeout
                )));
            }
        }
    }
}

impl Drop for ChromeDriverService {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            debug!("stopping chromedriver (pid {})", self.child.id());
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

fn free_port() -> UiResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Something that can start a browser session for the scenario.
pub trait BrowserLauncher {
    type Client: WebDriverHttpClientSync + 'static;

    fn launch(&mut self) -> UiResult<GenericWebDriver<Self::Client>>;
}

/// Launches Chrome through a chromedriver found on `PATH` (or at `driver_path`).
#[derive(Debug)]
pub struct ChromeLauncher {
    pub driver_path: PathBuf,
    pub headless: bool,
    pub startup_timeout: Duration,
    /// Timeout for each WebDriver request once the session is up.
    pub request_timeout: Duration,
    service: Option<ChromeDriverService>,
}

impl Default for ChromeLauncher {
    fn default() -> Self {
        ChromeLauncher {
            driver_path: PathBuf::from("chromedriver"),
            headless: false,
            startup_timeout: Duration::from_secs(30),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            service: None,
        }
    }
}

impl BrowserLauncher for ChromeLauncher {
    type Client = ReqwestDriverSync;

    fn launch(&mut self) -> UiResult<WebDriver> {
        let service = ChromeDriverService::start(&self.driver_path, self.startup_timeout)?;

        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }
        let driver = WebDriver::new_with_timeout(service.url(), &caps, Some(self.request_timeout))?;
        self.service = Some(service);
        Ok(driver)
    }
}
