use anyhow::Result;
use clap::Parser;
use nba_career_scrape::pipeline::{DEFAULT_BASE_URL, DEFAULT_MAX_RANK, DEFAULT_OUT_DIR};
use nba_career_scrape::{
    CareerScraperBuilder, Driver, MalformedRowPolicy, RowLayout, SessionOptions,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nba-career-scrape")]
#[command(about = "Samples random players per season and saves their career stats as CSV")]
struct Args {
    /// Seasons to sample, e.g. 1990-91
    #[arg(required = true)]
    seasons: Vec<String>,

    /// Players to draw per season
    #[arg(short = 'n', long, default_value_t = 1, env = "NBA_SCRAPE_PER_SEASON")]
    per_season: usize,

    #[arg(short, long, default_value = DEFAULT_OUT_DIR, env = "NBA_SCRAPE_OUT_DIR")]
    out_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL, env = "NBA_SCRAPE_BASE_URL")]
    base_url: String,

    #[arg(long, default_value_t = Driver::Browser, env = "NBA_SCRAPE_DRIVER")]
    driver: Driver,

    /// Chrome/Chromium executable, detected when omitted
    #[arg(long, env = "NBA_SCRAPE_CHROME")]
    chrome: Option<PathBuf>,

    /// Wait around the leaderboard pagination change
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    /// Highest leaderboard rank to draw
    #[arg(long, default_value_t = DEFAULT_MAX_RANK)]
    max_rank: u32,

    /// Draws per player before a season is given up
    #[arg(long, default_value_t = 1000)]
    max_draws: u32,

    #[arg(long, default_value_t = RowLayout::Interleaved)]
    layout: RowLayout,

    #[arg(long, default_value_t = MalformedRowPolicy::SkipRow)]
    on_malformed: MalformedRowPolicy,

    #[arg(long, env = "NBA_SCRAPE_SEED")]
    seed: Option<u64>,

    /// Also write the scraped players as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

const DEFAULT_LOG: &str = "nba_career_scrape=info";

/// `RUST_LOG` wins when set and valid; otherwise the crate logs at info.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let args = Args::parse();

    let scraper = CareerScraperBuilder::default()
        .seasons(args.seasons)
        .per_season(args.per_season)
        .base_url(args.base_url)
        .out_dir(args.out_dir)
        .ranks(1..=args.max_rank)
        .max_draws(args.max_draws)
        .layout(args.layout)
        .on_malformed(args.on_malformed)
        .seed(args.seed)
        .session(SessionOptions {
            driver: args.driver,
            settle: Duration::from_millis(args.settle_ms),
            chrome: args.chrome,
        })
        .build()?;

    let scraped = scraper.run().await?;
    for key in &scraped {
        println!("{key}");
    }

    if let Some(path) = args.summary {
        fs::write(&path, serde_json::to_string_pretty(&scraped)?)?;
        info!(path = %path.display(), players = scraped.len(), "wrote summary");
    }
    Ok(())
}
