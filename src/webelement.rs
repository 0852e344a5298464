use thirtyfour::common::command::Command;
use thirtyfour::common::connection_common::convert_json;
use thirtyfour::common::types::ElementId;
use thirtyfour::TypingData;

use crate::errors::WebDriverResult;
use crate::session::WebDriverSession;

/// The WebElement struct encapsulates a single element on a page.
///
/// WebElement structs are generally not constructed manually, but rather
/// they are returned from a `find_element()` call on the driver. The
/// reference is only valid for the page load it was found on.
#[derive(Debug, Clone)]
pub struct WebElement<'a> {
    pub element_id: ElementId,
    session: &'a WebDriverSession,
}

impl<'a> WebElement<'a> {
    pub fn new(session: &'a WebDriverSession, element_id: ElementId) -> Self {
        WebElement {
            element_id,
            session,
        }
    }

    fn cmd(&self, command: Command) -> WebDriverResult<serde_json::Value> {
        self.session.execute(command)
    }

    /// Get the rendered text of this element.
    pub fn text(&self) -> WebDriverResult<String> {
        let v = self.cmd(Command::GetElementText(self.element_id.clone()))?;
        convert_json(&v["value"])
    }

    /// Current `value` property, e.g. the contents of an input field.
    pub fn value(&self) -> WebDriverResult<Option<String>> {
        let v = self.cmd(Command::GetElementProperty(self.element_id.clone(), "value".to_owned()))?;
        if v["value"].is_null() {
            Ok(None)
        } else {
            convert_json(&v["value"]).map(Some)
        }
    }

    pub fn is_displayed(&self) -> WebDriverResult<bool> {
        let v = self.cmd(Command::IsElementDisplayed(self.element_id.clone()))?;
        convert_json(&v["value"])
    }

    pub fn click(&self) -> WebDriverResult<()> {
        self.cmd(Command::ElementClick(self.element_id.clone()))?;
        Ok(())
    }

    /// Clear the contents of an editable element.
    pub fn clear(&self) -> WebDriverResult<()> {
        self.cmd(Command::ElementClear(self.element_id.clone()))?;
        Ok(())
    }

    pub fn send_keys<S>(&self, keys: S) -> WebDriverResult<()>
    where
        S: Into<TypingData>,
    {
        self.cmd(Command::ElementSendKeys(self.element_id.clone(), keys.into()))?;
        Ok(())
    }
}
