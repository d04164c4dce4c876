// IPL Season Dashboard - Core Library
// Exposes all modules for use in the TUI/CLI, API server, and tests

pub mod config;
pub mod data;
pub mod error;
pub mod filters;
pub mod report;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{init_tracing, DataArgs};
pub use data::{
    load_dataset, load_deliveries, load_matches, Dataset, DatasetCache, Delivery, Match,
    DELIVERIES_FILE, MATCHES_FILE,
};
pub use error::{DataError, Result};
pub use filters::{
    deliveries_for_matches, distinct_values, distinct_values_with_nulls, matches_for_season,
    resolve_season, FilterChoices, HeadToHeadScope, SeasonView, Selection,
};
pub use report::{build_report, render_text, DashboardReport, Outcome, ThrillerMatch};
pub use stats::{
    HeadToHead, MatchupStats, Notice, Ranked, SeasonOverview, HEADLINE_TOP_N, LEADERBOARD_TOP_N,
};
