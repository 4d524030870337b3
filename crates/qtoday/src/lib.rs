pub mod parser;
pub mod scraper;
pub mod types;
pub mod utils;

pub use parser::parse_devotional;
pub use scraper::{ScraperConfig, ScraperError, WebScraper};
pub use types::{DateKey, Devotional, SourcedDevotional};
