// 📂 Data Loader - matches.csv + deliveries.csv
// Typed rows, null-token handling and a process-wide load cache

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info};

/// Default file names, resolved against the data directory
pub const MATCHES_FILE: &str = "matches.csv";
pub const DELIVERIES_FILE: &str = "deliveries.csv";

// ============================================================================
// ROW TYPES
// ============================================================================

/// One match (one row of matches.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: u64,

    /// Season label, e.g. "2019" or "2020/21"
    pub season: String,

    #[serde(default, deserialize_with = "nullable")]
    pub city: Option<String>,

    pub venue: String,
    pub date: String,
    pub team1: String,
    pub team2: String,

    #[serde(default, deserialize_with = "nullable")]
    pub winner: Option<String>,

    /// Result kind: "normal", "tie", "no result", ...
    #[serde(default, deserialize_with = "nullable")]
    pub result: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub result_margin: Option<f64>,

    #[serde(default, deserialize_with = "nullable")]
    pub player_of_match: Option<String>,

    // Optional columns (present in the 2008-2024 export, absent in older ones)
    #[serde(default, deserialize_with = "nullable")]
    pub match_type: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub toss_winner: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub toss_decision: Option<String>,
}

impl Match {
    /// Decided by runs or wickets (not a tie, no result or DLS)
    pub fn is_normal_result(&self) -> bool {
        self.result.as_deref() == Some("normal")
    }

    /// True if the two sides are `a` and `b`, in either order
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.team1 == a && self.team2 == b) || (self.team1 == b && self.team2 == a)
    }

    pub fn won_by(&self, team: &str) -> bool {
        self.winner.as_deref() == Some(team)
    }

    /// Parse the match date; the exports mix ISO and day-first formats
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(self.date.trim(), fmt).ok())
    }
}

/// One ball bowled (one row of deliveries.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub match_id: u64,

    #[serde(default, deserialize_with = "nullable")]
    pub inning: Option<u32>,

    #[serde(default, deserialize_with = "nullable")]
    pub batting_team: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub bowling_team: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub over: Option<u32>,

    #[serde(default, deserialize_with = "nullable")]
    pub ball: Option<u32>,

    pub batter: String,
    pub bowler: String,
    pub batsman_runs: u32,

    #[serde(default, deserialize_with = "nullable")]
    pub extra_runs: Option<u32>,

    pub total_runs: u32,

    #[serde(default, deserialize_with = "nullable")]
    pub dismissal_kind: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub player_dismissed: Option<String>,
}

impl Delivery {
    pub fn is_four(&self) -> bool {
        self.batsman_runs == 4
    }

    pub fn is_six(&self) -> bool {
        self.batsman_runs == 6
    }

    /// No runs of any kind came off the ball
    pub fn is_dot_ball(&self) -> bool {
        self.total_runs == 0
    }
}

// ============================================================================
// NULL HANDLING
// ============================================================================

/// Tokens the published exports use for a missing value
pub fn is_null_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(value) if !is_null_token(&value) => {
            value.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Both tables, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub matches: Vec<Match>,
    pub deliveries: Vec<Delivery>,
}

impl Dataset {
    pub fn new(matches: Vec<Match>, deliveries: Vec<Delivery>) -> Self {
        Self { matches, deliveries }
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_error = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result.map_err(csv_error)?);
    }

    Ok(rows)
}

pub fn load_matches(path: &Path) -> Result<Vec<Match>> {
    read_csv(path)
}

pub fn load_deliveries(path: &Path) -> Result<Vec<Delivery>> {
    read_csv(path)
}

/// Load both files. Both must exist before either is read.
pub fn load_dataset(matches_path: &Path, deliveries_path: &Path) -> Result<Dataset> {
    for path in [matches_path, deliveries_path] {
        if !path.exists() {
            return Err(DataError::MissingFile {
                path: path.to_path_buf(),
            });
        }
    }

    let started = Instant::now();
    let matches = load_matches(matches_path)?;
    let deliveries = load_deliveries(deliveries_path)?;

    info!(
        matches = matches.len(),
        deliveries = deliveries.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );

    Ok(Dataset::new(matches, deliveries))
}

// ============================================================================
// CACHE
// ============================================================================

/// Loads the dataset on first use and keeps it for the process lifetime
#[derive(Debug)]
pub struct DatasetCache {
    matches_path: PathBuf,
    deliveries_path: PathBuf,
    dataset: OnceLock<Dataset>,
}

impl DatasetCache {
    pub fn new(matches_path: impl Into<PathBuf>, deliveries_path: impl Into<PathBuf>) -> Self {
        Self {
            matches_path: matches_path.into(),
            deliveries_path: deliveries_path.into(),
            dataset: OnceLock::new(),
        }
    }

    /// Cache that never touches the disk
    pub fn preloaded(dataset: Dataset) -> Self {
        let cache = Self::new(MATCHES_FILE, DELIVERIES_FILE);
        let _ = cache.dataset.set(dataset);
        cache
    }

    pub fn matches_path(&self) -> &Path {
        &self.matches_path
    }

    pub fn deliveries_path(&self) -> &Path {
        &self.deliveries_path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<&Dataset> {
        if let Some(dataset) = self.dataset.get() {
            debug!("dataset cache hit");
            return Ok(dataset);
        }

        let loaded = load_dataset(&self.matches_path, &self.deliveries_path)?;
        // Another thread may have filled the cell meanwhile; keep the first value.
        Ok(self.dataset.get_or_init(|| loaded))
    }
}

// ============================================================================
// TESTS
// ============================================================================
