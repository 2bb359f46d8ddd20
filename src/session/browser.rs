//! Browser automation using chromiumoxide.

use super::{no_page, Session};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// One headless browser and one tab, reused for every navigation of a run.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    settle: Duration,
}

impl BrowserSession {
    pub async fn launch(settle: Duration, chrome: Option<&Path>) -> Result<Self> {
        let mut config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--disable-extensions")
            .window_size(1920, 1080);
        if let Some(path) = chrome {
            config = config.chrome_executable(path);
        }
        let config = config.build().map_err(ScrapeError::Session)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler drives the CDP connection and must be polled for the
        // browser to respond at all.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event failed");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            page: None,
            settle,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page.as_ref().ok_or_else(no_page)
    }
}

#[async_trait]
impl Session for BrowserSession {
    async fn open(&mut self, url: &str) -> Result<String> {
        debug!(url, "navigate");
        match self.page.clone() {
            Some(page) => {
                page.goto(url).await?;
            }
            None => {
                self.page = Some(self.browser.new_page(url).await?);
            }
        }
        let page = self.page()?;
        page.wait_for_navigation().await?;
        Ok(page.content().await?)
    }

    /// The leaderboard renders its table from script, so the page gets one
    /// settle period before the control is touched and another after.
    async fn expand_roster(&mut self, selector: &str) -> Result<String> {
        let page = self.page()?;
        sleep(self.settle).await;
        let select = page.find_element(selector).await?;
        select.click().await?;
        select.type_str("All").await?;
        select.press_key("Enter").await?;
        sleep(self.settle).await;
        Ok(page.content().await?)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!(error = %e, "failed to close page");
            }
        }
        let closed = self.browser.close().await;
        self.handler.abort();
        closed?;
        Ok(())
    }
}
