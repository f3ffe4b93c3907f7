// Site-specific scrapers

pub mod damtomo;
