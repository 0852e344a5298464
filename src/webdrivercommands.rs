use serde::Serialize;
use serde_json::Value;
use thirtyfour::common::command::{Command, FormatRequestData};
use thirtyfour::common::connection_common::convert_json;
use thirtyfour::common::types::{ElementId, ElementRef};
use thirtyfour::{By, SessionId};

use crate::errors::WebDriverResult;
use crate::http::connection_sync::WebDriverHttpClientSync;
use crate::query::ElementWaiter;
use crate::session::WebDriverSession;
use crate::webelement::WebElement;

/// The raw value of a locator, used to name the element in logs and errors.
pub fn locator_value<'a>(by: &By<'a>) -> &'a str {
    match *by {
        By::Id(x)
        | By::XPath(x)
        | By::LinkText(x)
        | By::PartialLinkText(x)
        | By::Name(x)
        | By::Tag(x)
        | By::ClassName(x)
        | By::Css(x) => x,
    }
}

/// Id used for requests made before a session exists.
pub(crate) fn no_session() -> SessionId {
    SessionId::from(String::new())
}

/// Start a new session and return its id along with the capabilities the server agreed to.
pub fn start_session<C>(
    conn: &dyn WebDriverHttpClientSync,
    capabilities: C,
) -> WebDriverResult<(SessionId, Value)>
where
    C: Serialize,
{
    let caps = serde_json::to_value(capabilities)?;
    let v = conn.execute(Command::NewSession(caps).format_request(&no_session()))?;

    // Pre-W3C servers put the session id next to `value` instead of inside it.
    let (id, capabilities) = if v["sessionId"].is_string() {
        (&v["sessionId"], v["value"].clone())
    } else {
        (&v["value"]["sessionId"], v["value"]["capabilities"].clone())
    };
    let id: String = convert_json(id)?;
    Ok((SessionId::from(id), capabilities))
}

/// All browser-level commands, shared by `WebDriver` and `WebDriverSession`.
pub trait WebDriverCommands {
    fn session(&self) -> &WebDriverSession;

    /// Convenience wrapper for executing a WebDriver command.
    fn cmd(&self, command: Command) -> WebDriverResult<Value> {
        self.session().execute(command)
    }

    /// Navigate to the specified URL.
    fn get(&self, url: &str) -> WebDriverResult<()> {
        self.cmd(Command::NavigateTo(url.to_string()))?;
        Ok(())
    }

    fn title(&self) -> WebDriverResult<String> {
        let v = self.cmd(Command::GetTitle)?;
        convert_json(&v["value"])
    }

    /// Look up one element, once. Fails with `NoSuchElement` if it is absent.
    fn find_element(&self, by: By<'_>) -> WebDriverResult<WebElement<'_>> {
        let v = self.cmd(Command::FindElement(by.get_w3c_selector()))?;
        let elem: ElementRef = convert_json(&v["value"])?;
        Ok(WebElement::new(self.session(), ElementId::from(elem.id)))
    }

    /// Start an explicit wait for the element matching `by`.
    ///
    /// See [`ElementWaiter`] for the available conditions.
    fn wait_until<'a>(&'a self, by: By<'a>) -> ElementWaiter<'a> {
        let poller = self.session().config().query_poller.clone();
        ElementWaiter::new(self.session(), by, poller)
    }
}
