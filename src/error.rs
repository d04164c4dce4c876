//! Error types for the dashboard library

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unknown season '{season}' (available: {available})")]
    UnknownSeason { season: String, available: String },

    #[error("Dataset has no matches")]
    EmptyDataset,
}

impl DataError {
    pub fn unknown_season(season: &str, available: &[String]) -> Self {
        DataError::UnknownSeason {
            season: season.to_string(),
            available: available.join(", "),
        }
    }

    /// True for errors caused by the caller's selection rather than the input files
    pub fn is_selection_error(&self) -> bool {
        matches!(self, DataError::UnknownSeason { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_names_path() {
        let err = DataError::MissingFile {
            path: PathBuf::from("data/matches.csv"),
        };

        assert_eq!(err.to_string(), "CSV file not found: data/matches.csv");
        assert!(!err.is_selection_error());
    }

    #[test]
    fn test_unknown_season_lists_available() {
        let available = vec!["2019".to_string(), "2020/21".to_string()];
        let err = DataError::unknown_season("1999", &available);

        assert_eq!(
            err.to_string(),
            "Unknown season '1999' (available: 2019, 2020/21)"
        );
        assert!(err.is_selection_error());
    }
}
