use super::{no_page, Session};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Fetches pages over plain HTTP. The served markup must already list the
/// full roster; there is no script to drive the pagination control.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    current: Option<String>,
}

impl HttpSession {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("nba-career-scrape/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            current: None,
        })
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn open(&mut self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.current = Some(html.clone());
        Ok(html)
    }

    async fn expand_roster(&mut self, selector: &str) -> Result<String> {
        debug!(selector, "http session cannot expand pagination, using page as served");
        self.current.clone().ok_or_else(no_page)
    }

    async fn close(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}
