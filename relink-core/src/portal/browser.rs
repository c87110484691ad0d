//! Browser automation capability seam
//!
//! `BrowserSession` abstracts the handful of DOM operations the portal login
//! protocol needs, so the automation backend can be swapped without touching
//! the authenticator or the state machine. The production backend drives a
//! Chrome/Chromium instance over the DevTools protocol via headless_chrome;
//! its blocking CDP calls are isolated on the blocking thread pool.

use crate::error::BrowserError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::auth::SessionLauncher;

/// The DOM operations the portal login protocol is built from
#[async_trait]
pub trait BrowserSession {
    /// Load a page and wait for navigation to finish
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Inner text of the first element matching `selector`, or `None` when
    /// no such element exists right now
    async fn element_text(&self, selector: &str) -> Result<Option<String>, BrowserError>;

    /// Set a form field's value directly by element id, bypassing simulated
    /// typing
    async fn set_field_value(&self, element_id: &str, value: &str) -> Result<(), BrowserError>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Wait up to `timeout` for an element to appear and return its text
    async fn wait_for_element_text(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<String, BrowserError>;

    /// Release the underlying automation session
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Chrome DevTools backed browser session
pub struct ChromeSession {
    /// Kept alive for the session lifetime; dropping it tears down Chrome
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch a Chrome instance and open a blank tab
    pub async fn launch(headless: bool) -> Result<Self, BrowserError> {
        tokio::task::spawn_blocking(move || {
            let options = LaunchOptions::default_builder()
                .headless(headless)
                .sandbox(false)
                .build()
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: e.to_string(),
                })?;

            let browser = Browser::new(options).map_err(|e| BrowserError::LaunchFailed {
                reason: e.to_string(),
            })?;
            let tab = browser.new_tab().map_err(|e| BrowserError::LaunchFailed {
                reason: e.to_string(),
            })?;

            info!(headless, "Browser initialized");
            Ok(Self {
                browser: Some(browser),
                tab,
            })
        })
        .await
        .map_err(|e| BrowserError::LaunchFailed {
            reason: e.to_string(),
        })?
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, BrowserError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Tab>) -> Result<T, BrowserError> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || op(tab))
            .await
            .map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })?
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let url = url.to_string();
        self.blocking(move |tab| {
            tab.navigate_to(&url).map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })?;
            tab.wait_until_navigated()
                .map_err(|e| BrowserError::Automation {
                    reason: e.to_string(),
                })?;
            Ok(())
        })
        .await
    }

    async fn element_text(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        let selector = selector.to_string();
        self.blocking(move |tab| {
            let element = match tab.find_element(&selector) {
                Ok(element) => element,
                Err(_) => return Ok(None),
            };
            let text = element.get_inner_text().map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })?;
            Ok(Some(text))
        })
        .await
    }

    async fn set_field_value(&self, element_id: &str, value: &str) -> Result<(), BrowserError> {
        let script = format!(
            "document.getElementById({}).value = {};",
            js_string_literal(element_id),
            js_string_literal(value)
        );
        self.blocking(move |tab| {
            tab.evaluate(&script, false)
                .map_err(|e| BrowserError::Automation {
                    reason: e.to_string(),
                })?;
            Ok(())
        })
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let selector = selector.to_string();
        self.blocking(move |tab| {
            let element = tab
                .find_element(&selector)
                .map_err(|_| BrowserError::ElementNotFound {
                    selector: selector.clone(),
                })?;
            element.click().map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })?;
            Ok(())
        })
        .await
    }

    async fn wait_for_element_text(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<String, BrowserError> {
        let selector = selector.to_string();
        self.blocking(move |tab| {
            let element = tab
                .wait_for_element_with_custom_timeout(&selector, timeout)
                .map_err(|_| BrowserError::ElementTimeout {
                    selector: selector.clone(),
                })?;
            element.get_inner_text().map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })
        })
        .await
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let Some(browser) = self.browser.take() else {
            return Err(BrowserError::SessionClosed);
        };
        // Dropping the handle tears down the Chrome process; that involves
        // process waits, so it stays off the async threads too.
        tokio::task::spawn_blocking(move || drop(browser))
            .await
            .map_err(|e| BrowserError::Automation {
                reason: e.to_string(),
            })?;
        debug!("Browser session released");
        Ok(())
    }
}

/// Launches Chrome sessions on demand
pub struct ChromeLauncher {
    headless: bool,
}

impl ChromeLauncher {
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession + Send + Sync>, BrowserError> {
        let session = ChromeSession::launch(self.headless).await?;
        Ok(Box::new(session))
    }
}

/// Quote a string as a JavaScript literal
///
/// Keeps credentials intact through the script channel whatever characters
/// they contain.
fn js_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\u{2028}' => literal.push_str("\\u2028"),
            '\u{2029}' => literal.push_str("\\u2029"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
