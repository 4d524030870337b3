use std::process;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use qtoday::scraper::{DEFAULT_BASE_URL, ScraperConfig, WebScraper};
use qtoday::types::DateKey;

#[derive(Parser)]
#[command(name = "qtoday")]
#[command(about = "Fetch the daily duranno.com devotional", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        short = 'd',
        long,
        value_name = "YYYY-MM-DD",
        help = "Devotional date (defaults to today in UTC)",
        value_parser = |s: &str| s.parse::<DateKey>().map_err(|e| e.to_string()),
    )]
    date: Option<DateKey>,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(long, default_value = DEFAULT_BASE_URL, help = "Base URL of the devotional site")]
    base_url: String,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout for each page request"
    )]
    timeout: u64,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 25,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Overall time budget across all source pages"
    )]
    deadline: u64,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let date = cli.date.unwrap_or_else(DateKey::today_utc);

    let scraper = WebScraper::with_config(ScraperConfig {
        base_url: cli.base_url,
        request_timeout: Duration::from_secs(cli.timeout),
        deadline: Duration::from_secs(cli.deadline),
    })?;

    log::info!("Fetching devotional for {}...", date);

    let sourced = scraper.fetch_devotional(Some(&date)).await.unwrap_or_else(|e| {
        log::error!("Error fetching devotional: {}", e);
        process::exit(1);
    });

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sourced)?),
        OutputFormat::Text => println!("{}", sourced),
    }

    Ok(())
}
