pub mod career;
pub mod error;
mod html;
pub mod pipeline;
pub mod roster;
pub mod session;
pub mod writer;

pub use career::{Career, CareerParser, MalformedRowPolicy, RowLayout, SeasonRow};
pub use error::{Result, ScrapeError};
pub use pipeline::{CareerScraper, CareerScraperBuilder};
pub use roster::{PlayerLink, Roster};
pub use session::{Driver, HttpSession, Session, SessionOptions};
pub use writer::{CsvStore, PlayerKey, HEADER};
