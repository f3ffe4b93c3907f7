/// Site constants for the DAM tomo scoring history pages.
/// Selectors and category ids must match the markup served by clubdam.com.

pub const LOGIN_URL: &str = "https://www.clubdam.com/app/damtomo/auth/member/Login.do";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

// Environment variables
pub const ENV_MEMBER_ID: &str = "CLUB_DAM_ID";
pub const ENV_PASSWORD: &str = "CLUB_DAM_PASS";
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";

// Login form
pub const LOGIN_ID_INPUT: &str = r#"input[name="id"]"#;
pub const LOGIN_PASSWORD_INPUT: &str = r#"input[name="password"]"#;
pub const LOGIN_SUBMIT: &str = r#"input[type="submit"][value="ログイン"]"#;

// Result markup, relative to a category's result container
pub const NO_RESULT_MARKER: &str = ".no_result";
pub const PAGER_LINKS: &str = ".ppage li a";
pub const PAGER_ITEMS: &str = ".ppage li";
pub const RESULT_TABLE: &str = "table.ai";

/// Artist recorded when the result row carries no artist text.
pub const UNKNOWN_ARTIST: &str = "Unknown";

// Snapshot destinations
pub const PRIMARY_SNAPSHOT_PATH: &str = "scores.json";
pub const DASHBOARD_SNAPSHOT_PATH: &str = "public/scores.json";

/// Scoring categories in walk order: (element id prefix, display name).
pub const SCORING_CATEGORIES: [(&str, &str); 3] = [
    ("DamHistoryMarkingAi", "精密採点Ai"),
    ("DamHistoryMarkingHearts", "精密採点Ai Heart"),
    ("DamHistoryMarkingCollabo", "精密採点 × ONE PIECE"),
];

// Timing defaults, milliseconds
pub const LOGIN_TIMEOUT_MS: u64 = 60_000;
pub const CONTAINER_TIMEOUT_MS: u64 = 5_000;
pub const SETTLE_MS: u64 = 1_500;
pub const POLL_INTERVAL_MS: u64 = 250;

/// Number of entries in the end-of-run leaderboard.
pub const TOP_SCORES_SHOWN: usize = 10;
