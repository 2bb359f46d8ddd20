use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no link-bearing player found for season {season} after {attempts} draws")]
    PoolExhausted { season: String, attempts: u32 },

    #[error("missing {0} in page")]
    MissingElement(&'static str),

    #[error("row {row}: missing {field}")]
    MalformedRow { row: usize, field: &'static str },

    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("session error: {0}")]
    Session(String),

    #[cfg(feature = "browser")]
    #[error(transparent)]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Structural failures are scoped to a single row or player; everything
    /// else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingElement(_) | ScrapeError::MalformedRow { .. }
        )
    }

    pub fn selector(selector: &str) -> Self {
        ScrapeError::InvalidSelector(selector.to_string())
    }
}
