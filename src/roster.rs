//! Season leaderboard: random rank draws resolved to player links.

use crate::error::{Result, ScrapeError};
use crate::html::{selector, text_of};
use rand::Rng;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// Pagination control of the leaderboard table.
pub const PAGINATION_SELECT: &str = ".stats-table-pagination__select";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerLink {
    pub name: String,
    /// Link to the player's season stats, as found in the leaderboard.
    pub href: String,
}

impl PlayerLink {
    pub fn career_url(&self, base: &str) -> Result<String> {
        let href = self.href.replace("traditional", "career");
        Url::parse(base)
            .and_then(|base| base.join(&href))
            .map(String::from)
            .map_err(|e| ScrapeError::InvalidUrl {
                url: href,
                reason: e.to_string(),
            })
    }
}

pub fn leaders_url(base: &str, season: &str) -> String {
    format!(
        "{}/leaders/?Season={}&SeasonType=Regular%20Season",
        base.trim_end_matches('/'),
        season
    )
}

/// A fully expanded leaderboard for one season.
#[derive(Debug)]
pub struct Roster {
    season: String,
    document: Html,
    link: Selector,
    ranks: RangeInclusive<u32>,
    max_draws: u32,
}

impl Roster {
    pub fn new(
        season: impl Into<String>,
        html: &str,
        ranks: RangeInclusive<u32>,
        max_draws: u32,
    ) -> Result<Self> {
        Ok(Self {
            season: season.into(),
            document: Html::parse_document(html),
            link: selector("a[href]")?,
            ranks,
            max_draws,
        })
    }

    /// Draw random ranks until one resolves to a player not in `taken`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, taken: &[PlayerLink]) -> Result<PlayerLink> {
        for attempt in 1..=self.max_draws {
            let rank = rng.gen_range(self.ranks.clone());
            match self.resolve(rank) {
                Some(player) if !taken.contains(&player) => {
                    debug!(
                        season = %self.season,
                        rank,
                        attempt,
                        name = %player.name,
                        "drew player"
                    );
                    return Ok(player);
                }
                Some(player) => debug!(rank, name = %player.name, "already sampled, redrawing"),
                None => debug!(rank, "no player at rank, redrawing"),
            }
        }
        Err(ScrapeError::PoolExhausted {
            season: self.season.clone(),
            attempts: self.max_draws,
        })
    }

    /// The same number shows up all over the page (pagination options, stat
    /// cells), so each textual match is checked for a link two levels up and
    /// the first that has one wins.
    pub fn resolve(&self, rank: u32) -> Option<PlayerLink> {
        let needle = rank.to_string();
        self.document
            .root_element()
            .descendants()
            .filter(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.trim() == needle)
            })
            .filter_map(|node| node.parent()?.parent())
            .filter_map(ElementRef::wrap)
            .find_map(|row| {
                let anchor = row.select(&self.link).next()?;
                let href = anchor.value().attr("href")?;
                Some(PlayerLink {
                    name: text_of(anchor),
                    href: href.to_string(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;

    fn roster(ranks: RangeInclusive<u32>, max_draws: u32) -> Roster {
        let content = fs::read_to_string("fixtures/leaders.html").unwrap();
        Roster::new("2001-02", &content, ranks, max_draws).unwrap()
    }

    #[test]
    fn resolve_should_skip_matches_without_link() {
        let roster = roster(1..=3, 10);
        // "2" first appears as a pagination option
        let player = roster.resolve(2).unwrap();
        assert_eq!(player.name, "Tim Duncan");
        assert_eq!(player.href, "/player/1495/traditional/");
    }

    #[test]
    fn resolve_should_miss_unlisted_ranks() {
        let roster = roster(1..=3, 10);
        assert_eq!(roster.resolve(50), None);
        assert_eq!(roster.resolve(299), None);
    }

    #[test]
    fn draw_should_return_distinct_players_then_exhaust() {
        let roster = roster(1..=3, 200);
        let mut rng = StdRng::seed_from_u64(7);
        let mut taken = vec![];
        for _ in 0..3 {
            let player = roster.draw(&mut rng, &taken).unwrap();
            assert!(!taken.contains(&player));
            taken.push(player);
        }
        let mut names: Vec<_> = taken.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["Manu Ginobili", "Tim Duncan", "Tony Parker"]);

        let err = roster.draw(&mut rng, &taken).unwrap_err();
        assert!(matches!(err, ScrapeError::PoolExhausted { attempts: 200, .. }));
    }

    #[test]
    fn draw_should_exhaust_when_range_misses_roster() {
        let roster = roster(100..=300, 25);
        let mut rng = StdRng::seed_from_u64(1);
        let err = roster.draw(&mut rng, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no link-bearing player found for season 2001-02 after 25 draws"
        );
    }

    #[test]
    fn career_url_should_swap_route_segment() {
        let player = PlayerLink {
            name: "Tony Parker".into(),
            href: "/player/2225/traditional/".into(),
        };
        assert_eq!(
            player.career_url("https://stats.nba.com").unwrap(),
            "https://stats.nba.com/player/2225/career/"
        );
        assert!(player.career_url("not a url").is_err());
    }

    #[test]
    fn leaders_url_should_embed_season() {
        assert_eq!(
            leaders_url("https://stats.nba.com/", "1990-91"),
            "https://stats.nba.com/leaders/?Season=1990-91&SeasonType=Regular%20Season"
        );
    }
}
