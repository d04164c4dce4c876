// 🎛️ Filter Engine - season subsets and selection domains

use crate::data::{Dataset, Delivery, Match};
use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// ROW FILTERS
// ============================================================================

/// All matches played in `season`
pub fn matches_for_season<'a>(matches: &'a [Match], season: &str) -> Vec<&'a Match> {
    matches.iter().filter(|m| m.season == season).collect()
}

/// Ids of the given matches
pub fn match_ids<'a, I>(matches: I) -> HashSet<u64>
where
    I: IntoIterator<Item = &'a Match>,
{
    matches.into_iter().map(|m| m.id).collect()
}

/// All deliveries bowled in one of `match_ids`
pub fn deliveries_for_matches<'a>(
    deliveries: &'a [Delivery],
    match_ids: &HashSet<u64>,
) -> Vec<&'a Delivery> {
    deliveries
        .iter()
        .filter(|d| match_ids.contains(&d.match_id))
        .collect()
}

/// Sorted unique values of a column; rows where `column` yields `None` are dropped
pub fn distinct_values<T, K, F>(rows: impl IntoIterator<Item = T>, column: F) -> Vec<K>
where
    K: Ord,
    F: Fn(T) -> Option<K>,
{
    rows.into_iter()
        .filter_map(column)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Like [`distinct_values`] but keeps nulls, which sort first
pub fn distinct_values_with_nulls<T, K, F>(
    rows: impl IntoIterator<Item = T>,
    column: F,
) -> Vec<Option<K>>
where
    K: Ord,
    F: Fn(T) -> Option<K>,
{
    rows.into_iter()
        .map(column)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every season in the dataset, sorted
pub fn seasons(dataset: &Dataset) -> Vec<String> {
    distinct_values(&dataset.matches, |m| Some(m.season.clone()))
}

/// Every team that appears on either side of any match
pub fn teams(dataset: &Dataset) -> Vec<String> {
    distinct_values(
        dataset.matches.iter().flat_map(|m| [&m.team1, &m.team2]),
        |team| Some(team.clone()),
    )
}

/// Validate `requested`, or fall back to the first season
pub fn resolve_season(dataset: &Dataset, requested: Option<&str>) -> Result<String> {
    let available = seasons(dataset);

    match requested {
        Some(season) if available.iter().any(|s| s == season) => Ok(season.to_string()),
        Some(season) => Err(DataError::unknown_season(season, &available)),
        None => available.into_iter().next().ok_or(DataError::EmptyDataset),
    }
}

// ============================================================================
// SEASON VIEW
// ============================================================================

/// One season's matches and the deliveries bowled in them
#[derive(Debug, Clone)]
pub struct SeasonView<'a> {
    pub season: String,
    pub matches: Vec<&'a Match>,
    pub deliveries: Vec<&'a Delivery>,
}

impl<'a> SeasonView<'a> {
    pub fn new(dataset: &'a Dataset, season: &str) -> Self {
        let matches = matches_for_season(&dataset.matches, season);
        let ids = match_ids(matches.iter().copied());
        let deliveries = deliveries_for_matches(&dataset.deliveries, &ids);

        Self {
            season: season.to_string(),
            matches,
            deliveries,
        }
    }

    pub fn batters(&self) -> Vec<String> {
        distinct_values(&self.deliveries, |d| Some(d.batter.clone()))
    }

    pub fn bowlers(&self) -> Vec<String> {
        distinct_values(&self.deliveries, |d| Some(d.bowler.clone()))
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Valid choices for every selector, given a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterChoices {
    pub season: String,
    pub seasons: Vec<String>,
    pub batters: Vec<String>,
    pub bowlers: Vec<String>,
    pub teams: Vec<String>,
}

impl FilterChoices {
    pub fn for_season(dataset: &Dataset, season: &str) -> Result<Self> {
        let season = resolve_season(dataset, Some(season))?;
        Ok(Self::from_view(dataset, &SeasonView::new(dataset, &season)))
    }

    pub fn from_view(dataset: &Dataset, view: &SeasonView<'_>) -> Self {
        Self {
            season: view.season.clone(),
            seasons: seasons(dataset),
            batters: view.batters(),
            bowlers: view.bowlers(),
            teams: teams(dataset),
        }
    }
}

/// Which matches the head-to-head record is counted over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadToHeadScope {
    #[default]
    AllSeasons,
    Season,
}

/// The user's current filter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub season: String,
    pub batter: Option<String>,
    pub bowler: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    #[serde(default)]
    pub head_to_head_scope: HeadToHeadScope,
}

impl Selection {
    pub fn new(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            ..Self::default()
        }
    }

    pub fn with_batter(mut self, batter: impl Into<String>) -> Self {
        self.batter = Some(batter.into());
        self
    }

    pub fn with_bowler(mut self, bowler: impl Into<String>) -> Self {
        self.bowler = Some(bowler.into());
        self
    }

    pub fn with_teams(mut self, team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        self.team_a = Some(team_a.into());
        self.team_b = Some(team_b.into());
        self
    }

    pub fn with_scope(mut self, scope: HeadToHeadScope) -> Self {
        self.head_to_head_scope = scope;
        self
    }

    /// Fill unset selectors with the first entry of their domain
    pub fn with_defaults(mut self, choices: &FilterChoices) -> Self {
        fn first(current: Option<String>, domain: &[String]) -> Option<String> {
            current.or_else(|| domain.first().cloned())
        }

        self.batter = first(self.batter, &choices.batters);
        self.bowler = first(self.bowler, &choices.bowlers);
        self.team_a = first(self.team_a, &choices.teams);
        self.team_b = first(self.team_b, &choices.teams);
        self
    }

    /// Validate the season and default the remaining selectors
    pub fn resolve(self, dataset: &Dataset) -> Result<(Self, FilterChoices)> {
        let choices = FilterChoices::for_season(dataset, &self.season)?;
        Ok((self.with_defaults(&choices), choices))
    }
}

// ============================================================================
// TESTS
// ============================================================================
