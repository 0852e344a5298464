#![allow(dead_code)]

//! In-process stand-in for a WebDriver server, backed by a tiny DOM.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use formcheck::http::connection_sync::{HttpClientCreateParams, WebDriverHttpClientSync};
use formcheck::prelude::*;
use formcheck::{GenericWebDriver, RequestData, RequestMethod};
use serde_json::{json, Value};

pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
pub const SESSION_ID: &str = "fake-session";

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub displayed: bool,
    pub value: String,
    pub text: String,
    /// Clicks rejected with "element click intercepted" before one lands.
    pub intercept_clicks: u32,
    pub clicks: u32,
}

impl FakeElement {
    pub fn visible() -> Self {
        FakeElement {
            displayed: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReply {
    /// Show the thank-you line built from the typed name and email.
    Confirmation,
    Text(String),
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub title: String,
    pub elements: HashMap<String, FakeElement>,
    /// Lookups of an id that miss before the element shows up.
    pub appear_after: HashMap<String, u32>,
    pub submit_reply: Option<SubmitReply>,
    /// Answer title requests and element lookups with "invalid session id".
    pub session_lost: bool,
    /// Reject navigation with "unknown error".
    pub navigation_fails: bool,
    /// Reject session deletion with "unknown error".
    pub delete_fails: bool,

    pub lookups: HashMap<String, u32>,
    pub navigations: Vec<String>,
    pub sessions_created: u32,
    pub delete_requests: u32,
    pub sessions_deleted: u32,
}

impl FakePage {
    /// The page bundled with the crate: two inputs, a submit button and a hidden result.
    pub fn contact_form() -> Self {
        let mut page = FakePage {
            title: "Test page".to_string(),
            submit_reply: Some(SubmitReply::Confirmation),
            ..Default::default()
        };
        page.elements.insert("name".into(), FakeElement::visible());
        page.elements.insert("email".into(), FakeElement::visible());
        page.elements.insert("submit-btn".into(), FakeElement::visible());
        page.elements.insert("result".into(), FakeElement::default());
        page
    }

    pub fn element(&self, id: &str) -> &FakeElement {
        &self.elements[id]
    }

    pub fn element_mut(&mut self, id: &str) -> &mut FakeElement {
        self.elements.get_mut(id).expect("no such fake element")
    }

    pub fn lookups_of(&self, id: &str) -> u32 {
        self.lookups.get(id).copied().unwrap_or(0)
    }

    fn find(&mut self, body: &Value) -> Result<Value, WebDriverError> {
        let query = body["value"].as_str().unwrap_or_default();
        let id = query
            .strip_prefix("[id=\"")
            .and_then(|s| s.strip_suffix("\"]"))
            .or_else(|| query.strip_prefix('#'))
            .unwrap_or(query)
            .to_string();
        *self.lookups.entry(id.clone()).or_insert(0) += 1;

        if self.session_lost {
            return Err(error(404, "invalid session id", "session deleted"));
        }
        if let Some(remaining) = self.appear_after.get_mut(&id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(no_such_element(&id));
            }
        }
        if !self.elements.contains_key(&id) {
            return Err(no_such_element(&id));
        }
        Ok(json!({ "value": { ELEMENT_KEY: id } }))
    }

    fn click(&mut self, id: &str) -> Result<Value, WebDriverError> {
        let elem = self.element_mut(id);
        if elem.intercept_clicks > 0 {
            elem.intercept_clicks -= 1;
            return Err(error(
                400,
                "element click intercepted",
                "Other element would receive the click: <div class=\"overlay\">",
            ));
        }
        elem.clicks += 1;

        if id == "submit-btn" {
            let text = match &self.submit_reply {
                Some(SubmitReply::Confirmation) => format!(
                    "Thank you, {}! We'll contact you at {}.",
                    self.element("name").value,
                    self.element("email").value
                ),
                Some(SubmitReply::Text(t)) => t.clone(),
                None => return Ok(json!({ "value": null })),
            };
            if let Some(result) = self.elements.get_mut("result") {
                result.text = text;
                result.displayed = true;
            }
        }
        Ok(json!({ "value": null }))
    }

    fn handle(&mut self, req: RequestData) -> Result<Value, WebDriverError> {
        let parts: Vec<&str> = req.url.trim_start_matches('/').split('/').collect();
        let body = req.body.unwrap_or(Value::Null);

        match (req.method, parts.as_slice()) {
            (RequestMethod::Post, ["session"]) => {
                self.sessions_created += 1;
                Ok(json!({ "value": {
                    "sessionId": SESSION_ID,
                    "capabilities": { "browserName": "chrome" }
                }}))
            }
            (RequestMethod::Delete, ["session", _]) => {
                self.delete_requests += 1;
                if self.delete_fails {
                    return Err(error(500, "unknown error", "chrome not reachable"));
                }
                self.sessions_deleted += 1;
                Ok(json!({ "value": null }))
            }
            (RequestMethod::Post, ["session", _, "url"]) => {
                if self.navigation_fails {
                    return Err(error(500, "unknown error", "net::ERR_FILE_NOT_FOUND"));
                }
                self.navigations.push(body["url"].as_str().unwrap_or_default().to_string());
                Ok(json!({ "value": null }))
            }
            (RequestMethod::Get, ["session", _, "title"]) => {
                if self.session_lost {
                    return Err(error(404, "invalid session id", "session deleted"));
                }
                Ok(json!({ "value": self.title }))
            }
            (RequestMethod::Post, ["session", _, "element"]) => self.find(&body),
            (method, ["session", _, "element", id, rest @ ..]) => {
                let id = id.to_string();
                if !self.elements.contains_key(&id) {
                    return Err(error(404, "stale element reference", "element is gone"));
                }
                match (method, rest) {
                    (RequestMethod::Post, ["click"]) => self.click(&id),
                    (RequestMethod::Post, ["clear"]) => {
                        self.element_mut(&id).value.clear();
                        Ok(json!({ "value": null }))
                    }
                    (RequestMethod::Post, ["value"]) => {
                        let text = typed_text(&body);
                        self.element_mut(&id).value.push_str(&text);
                        Ok(json!({ "value": null }))
                    }
                    (RequestMethod::Get, ["text"]) => {
                        Ok(json!({ "value": self.element(&id).text }))
                    }
                    (RequestMethod::Get, ["displayed"]) => {
                        Ok(json!({ "value": self.element(&id).displayed }))
                    }
                    (RequestMethod::Get, ["property", "value"]) => {
                        Ok(json!({ "value": self.element(&id).value }))
                    }
                    _ => Err(error(404, "unknown command", &req.url)),
                }
            }
            _ => Err(error(404, "unknown command", &req.url)),
        }
    }
}

/// Keys sent to an element, from either the `text` or the `value` field.
fn typed_text(body: &Value) -> String {
    if let Some(text) = body["text"].as_str() {
        return text.to_string();
    }
    body["value"]
        .as_array()
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn error(status: u16, code: &str, message: &str) -> WebDriverError {
    let body = json!({ "value": { "error": code, "message": message, "stacktrace": "" } });
    WebDriverError::parse(status, body.to_string())
}

fn no_such_element(id: &str) -> WebDriverError {
    error(404, "no such element", &format!("Unable to locate element: [id=\"{}\"]", id))
}

#[derive(Debug, Clone)]
pub struct FakeClient {
    pub page: Arc<Mutex<FakePage>>,
}

impl WebDriverHttpClientSync for FakeClient {
    fn create(_params: HttpClientCreateParams) -> WebDriverResult<Self> {
        Ok(FakeClient {
            page: Arc::new(Mutex::new(FakePage::contact_form())),
        })
    }

    fn execute(&self, request_data: RequestData) -> WebDriverResult<Value> {
        self.page.lock().unwrap().handle(request_data)
    }
}

pub type FakeDriver = GenericWebDriver<FakeClient>;

/// Start a session on `page` with fast polling.
pub fn driver_for(page: FakePage) -> (FakeDriver, Arc<Mutex<FakePage>>) {
    let page = Arc::new(Mutex::new(page));
    let client = FakeClient { page: page.clone() };
    let mut driver = FakeDriver::with_client(client, DesiredCapabilities::chrome()).unwrap();
    driver.set_query_poller(formcheck::query::ElementPoller::TimeoutWithInterval(
        Duration::from_millis(100),
        Duration::from_millis(5),
    ));
    (driver, page)
}

pub struct FakeLauncher {
    pub page: Arc<Mutex<FakePage>>,
    pub fail: bool,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        FakeLauncher {
            page: Arc::new(Mutex::new(page)),
            fail: false,
        }
    }
}

impl BrowserLauncher for FakeLauncher {
    type Client = FakeClient;

    fn launch(&mut self) -> UiResult<FakeDriver> {
        if self.fail {
            return Err(UiError::DriverProcess(
                "failed to spawn chromedriver: No such file or directory".into(),
            ));
        }
        let client = FakeClient { page: self.page.clone() };
        Ok(FakeDriver::with_client(client, DesiredCapabilities::chrome())?)
    }
}

/// Writer whose contents stay readable after being handed to a logger.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Log writer that fails once everything written to it contains `trigger`.
#[derive(Clone)]
pub struct FailingWriter {
    pub buf: SharedBuf,
    pub trigger: &'static str,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)?;
        if self.buf.contents().contains(self.trigger) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A logger plus handles on what it wrote to the log file and to stdout.
pub fn capture_logger() -> (TestLogger, SharedBuf, SharedBuf) {
    let file = SharedBuf::default();
    let out = SharedBuf::default();
    let logger = TestLogger::with_writers(Box::new(file.clone()), Box::new(out.clone()));
    (logger, file, out)
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_millis(1))
}
