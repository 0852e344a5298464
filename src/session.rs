use std::sync::Arc;

use thirtyfour::common::command::{Command, FormatRequestData};
use thirtyfour::common::config::WebDriverConfig;
use thirtyfour::SessionId;

use crate::errors::WebDriverResult;
use crate::http::connection_sync::WebDriverHttpClientSync;
use crate::query::default_poller;
use crate::webdrivercommands::WebDriverCommands;

#[derive(Debug)]
pub struct WebDriverSession {
    session_id: SessionId,
    conn: Arc<dyn WebDriverHttpClientSync>,
    config: WebDriverConfig,
}

impl WebDriverSession {
    pub fn new(session_id: SessionId, conn: Arc<dyn WebDriverHttpClientSync>) -> Self {
        let mut config = WebDriverConfig::new();
        config.query_poller = default_poller();
        Self {
            session_id,
            conn,
            config,
        }
    }

    pub fn config(&self) -> &WebDriverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut WebDriverConfig {
        &mut self.config
    }

    pub fn execute(&self, command: Command) -> WebDriverResult<serde_json::Value> {
        self.conn.execute(command.format_request(&self.session_id))
    }
}

impl WebDriverCommands for WebDriverSession {
    fn session(&self) -> &WebDriverSession {
        self
    }
}
