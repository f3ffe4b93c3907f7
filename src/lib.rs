pub mod browser;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod scrapers;
pub mod stats;
pub mod storage;
pub mod types;

pub use error::{Result, ScraperError};
pub use types::{Category, IdentityKey, ScoreRecord};
