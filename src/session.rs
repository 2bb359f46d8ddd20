//! Page sessions: the single handle every navigation of a run goes through.

use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display, EnumString};

#[cfg(feature = "browser")]
mod browser;
mod http;

#[cfg(feature = "browser")]
pub use browser::BrowserSession;
pub use http::HttpSession;

/// A live page session. Implementations keep track of the current page so the
/// roster pagination can be expanded in place.
#[async_trait]
pub trait Session: Send {
    /// Navigate to `url` and return the rendered document.
    async fn open(&mut self, url: &str) -> Result<String>;

    /// Switch the pagination control matching `selector` on the current page
    /// to show every row, wait for the page to settle and return the document.
    async fn expand_roster(&mut self, selector: &str) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Driver {
    /// Headless Chromium; needed for script-rendered pages.
    #[default]
    Browser,
    /// Plain HTTP GETs; pagination cannot be expanded.
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionOptions {
    pub driver: Driver,
    pub settle: Duration,
    pub chrome: Option<PathBuf>,
}

impl SessionOptions {
    pub async fn connect(&self) -> Result<Box<dyn Session>> {
        match self.driver {
            Driver::Http => Ok(Box::new(HttpSession::new()?)),
            #[cfg(feature = "browser")]
            Driver::Browser => Ok(Box::new(
                BrowserSession::launch(self.settle, self.chrome.as_deref()).await?,
            )),
            #[cfg(not(feature = "browser"))]
            Driver::Browser => Err(ScrapeError::Session(
                "built without the `browser` feature".to_string(),
            )),
        }
    }
}

pub(crate) fn no_page() -> ScrapeError {
    ScrapeError::Session("no page loaded".to_string())
}
