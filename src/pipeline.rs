use crate::career::{CareerParser, MalformedRowPolicy, RowLayout};
use crate::error::{Result, ScrapeError};
use crate::roster::{leaders_url, PlayerLink, Roster, PAGINATION_SELECT};
use crate::session::{Session, SessionOptions};
use crate::writer::{CsvStore, PlayerKey};
use derive_builder::Builder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com";
pub const DEFAULT_OUT_DIR: &str = "csvs";
pub const DEFAULT_MAX_RANK: u32 = 300;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CareerScraper {
    seasons: Vec<String>,
    #[builder(default = "1")]
    per_season: usize,
    #[builder(setter(into), default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    #[builder(setter(into), default = "PathBuf::from(DEFAULT_OUT_DIR)")]
    out_dir: PathBuf,
    #[builder(default = "1..=DEFAULT_MAX_RANK")]
    ranks: RangeInclusive<u32>,
    #[builder(default = "1000")]
    max_draws: u32,
    #[builder(default)]
    layout: RowLayout,
    #[builder(default)]
    on_malformed: MalformedRowPolicy,
    #[builder(default)]
    seed: Option<u64>,
    #[builder(default)]
    session: SessionOptions,
}

impl CareerScraperBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ranks) = &self.ranks {
            if ranks.is_empty() {
                return Err(format!("empty rank range {ranks:?}"));
            }
        }
        if self.max_draws == Some(0) {
            return Err("max_draws must be at least 1".to_string());
        }
        Ok(())
    }
}

impl CareerScraper {
    /// Opens a session from the configured options and hands it to [`Self::run_in`].
    pub async fn run(&self) -> Result<Vec<PlayerKey>> {
        let session = self.session.connect().await?;
        self.run_in(session).await
    }

    /// Scrapes every season through `session` and closes it afterwards,
    /// whether the scrape succeeded or not.
    pub async fn run_in(&self, mut session: Box<dyn Session>) -> Result<Vec<PlayerKey>> {
        let scraped = self.scrape(session.as_mut()).await;
        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close session");
        }
        scraped
    }

    pub async fn scrape(&self, session: &mut dyn Session) -> Result<Vec<PlayerKey>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let parser = CareerParser::new(self.layout, self.on_malformed);
        let store = CsvStore::new(&self.out_dir);

        let mut scraped = vec![];
        for season in &self.seasons {
            let players = self.sample_season(session, season, &mut rng).await?;
            info!(%season, sampled = players.len(), "sampled roster");

            for player in players {
                if let Some(key) = self.scrape_player(session, &parser, &store, &player).await? {
                    scraped.push(key);
                }
            }
        }
        Ok(scraped)
    }

    async fn sample_season(
        &self,
        session: &mut dyn Session,
        season: &str,
        rng: &mut StdRng,
    ) -> Result<Vec<PlayerLink>> {
        session.open(&leaders_url(&self.base_url, season)).await?;
        let html = session.expand_roster(PAGINATION_SELECT).await?;
        let roster = Roster::new(season, &html, self.ranks.clone(), self.max_draws)?;

        let mut players = Vec::with_capacity(self.per_season);
        for _ in 0..self.per_season {
            match roster.draw(rng, &players) {
                Ok(player) => players.push(player),
                Err(e @ ScrapeError::PoolExhausted { .. }) => {
                    warn!(error = %e, "roster exhausted, moving on");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(players)
    }

    async fn scrape_player(
        &self,
        session: &mut dyn Session,
        parser: &CareerParser,
        store: &CsvStore,
        player: &PlayerLink,
    ) -> Result<Option<PlayerKey>> {
        let url = player.career_url(&self.base_url)?;
        let html = session.open(&url).await?;

        let career = match parser.parse(&html) {
            Ok(Some(career)) => career,
            Ok(None) => {
                debug!(name = %player.name, "no position listed, skipping");
                return Ok(None);
            }
            Err(e) if e.is_recoverable() => {
                warn!(name = %player.name, error = %e, "skipping player");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let key = PlayerKey::new(&player.name, career.position);
        let path = store.write(&key, &career.rows)?;
        info!(player = %key, seasons = career.rows.len(), path = %path.display(), "saved career");
        Ok(Some(key))
    }
}
