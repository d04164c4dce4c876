//! Command-line and environment configuration shared by both binaries.

use crate::data::{DatasetCache, DELIVERIES_FILE, MATCHES_FILE};
use clap::Args;
use std::path::PathBuf;

/// Where the two CSV files live
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Directory holding matches.csv and deliveries.csv.
    #[clap(long, env = "IPL_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Match-level CSV (defaults to `<data-dir>/matches.csv`).
    #[clap(long, env = "IPL_MATCHES_CSV")]
    pub matches: Option<PathBuf>,

    /// Ball-by-ball CSV (defaults to `<data-dir>/deliveries.csv`).
    #[clap(long, env = "IPL_DELIVERIES_CSV")]
    pub deliveries: Option<PathBuf>,
}

impl DataArgs {
    pub fn matches_path(&self) -> PathBuf {
        self.matches
            .clone()
            .unwrap_or_else(|| self.data_dir.join(MATCHES_FILE))
    }

    pub fn deliveries_path(&self) -> PathBuf {
        self.deliveries
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DELIVERIES_FILE))
    }

    pub fn cache(&self) -> DatasetCache {
        DatasetCache::new(self.matches_path(), self.deliveries_path())
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
