pub mod paginator;
pub mod parser;
pub mod session;
pub mod walker;

pub use paginator::{scrape_pages, CategoryPages};
pub use parser::{extract_scores, page_count};
pub use session::login;
pub use walker::{walk_categories, CategoryOutcome, CategoryReport, WalkResult};
