mod config;
mod handler;

pub use config::{Config, ConfigError};
pub use handler::{CACHE_CONTROL_FRESH, ErrorResponse, TodayParams, TodayResponse, router, today};
