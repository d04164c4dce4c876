// 📊 Aggregation Engine - grouped counts, sums and rankings
// Pure functions over borrowed season subsets

use crate::data::{Delivery, Match};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Bars on the headline charts (orange cap, purple cap, awards)
pub const HEADLINE_TOP_N: usize = 5;

/// Rows on the leaderboard tables
pub const LEADERBOARD_TOP_N: usize = 10;

/// Dismissals that are not credited to the bowler
pub const NON_BOWLER_DISMISSALS: [&str; 3] = ["run out", "retired hurt", "obstructing the field"];

// ============================================================================
// RANKINGS
// ============================================================================

/// One bar of a ranked chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked {
    pub name: String,
    pub value: u64,
}

impl Ranked {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Sort descending by value, ties by name, then keep the first `limit`
fn rank(totals: HashMap<&str, u64>, limit: Option<usize>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = totals
        .into_iter()
        .map(|(name, value)| Ranked::new(name, value))
        .collect();

    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    ranked
}

fn count_by<'a, T: 'a>(
    rows: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&'a T) -> Option<&'a str>,
) -> HashMap<&'a str, u64> {
    let mut totals = HashMap::new();
    for name in rows.into_iter().filter_map(key) {
        *totals.entry(name).or_insert(0) += 1;
    }
    totals
}

/// Matches won, per team
pub fn wins_per_team(matches: &[&Match]) -> Vec<Ranked> {
    rank(count_by(matches.iter().copied(), |m| m.winner.as_deref()), None)
}

/// Orange cap race: batsman runs summed per batter
pub fn top_run_scorers(deliveries: &[&Delivery], limit: usize) -> Vec<Ranked> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for d in deliveries {
        *totals.entry(d.batter.as_str()).or_insert(0) += u64::from(d.batsman_runs);
    }
    rank(totals, Some(limit))
}

/// A dismissal the bowler gets credit for
pub fn is_bowler_wicket(delivery: &Delivery) -> bool {
    delivery
        .dismissal_kind
        .as_deref()
        .is_some_and(|kind| !NON_BOWLER_DISMISSALS.contains(&kind))
}

/// Purple cap race: bowler-credited dismissals per bowler
pub fn top_wicket_takers(deliveries: &[&Delivery], limit: usize) -> Vec<Ranked> {
    let totals = count_by(
        deliveries.iter().copied().filter(|d| is_bowler_wicket(d)),
        |d| Some(d.bowler.as_str()),
    );
    rank(totals, Some(limit))
}

pub fn most_player_of_match(matches: &[&Match], limit: usize) -> Vec<Ranked> {
    let totals = count_by(matches.iter().copied(), |m| m.player_of_match.as_deref());
    rank(totals, Some(limit))
}

pub fn six_hitters(deliveries: &[&Delivery], limit: usize) -> Vec<Ranked> {
    let totals = count_by(
        deliveries.iter().copied().filter(|d| d.is_six()),
        |d| Some(d.batter.as_str()),
    );
    rank(totals, Some(limit))
}

/// Bowlers ranked by deliveries conceding nothing at all (extras included)
pub fn dot_ball_bowlers(deliveries: &[&Delivery], limit: usize) -> Vec<Ranked> {
    let totals = count_by(
        deliveries.iter().copied().filter(|d| d.is_dot_ball()),
        |d| Some(d.bowler.as_str()),
    );
    rank(totals, Some(limit))
}

// ============================================================================
// SEASON OVERVIEW
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonOverview {
    pub matches: usize,
    pub cities: usize,
    pub teams: usize,
    pub venues: usize,
}

pub fn season_overview(matches: &[&Match]) -> SeasonOverview {
    let cities: HashSet<&str> = matches.iter().filter_map(|m| m.city.as_deref()).collect();
    let teams: HashSet<&str> = matches
        .iter()
        .flat_map(|m| [m.team1.as_str(), m.team2.as_str()])
        .collect();
    let venues: HashSet<&str> = matches.iter().map(|m| m.venue.as_str()).collect();

    SeasonOverview {
        matches: matches.len(),
        cities: cities.len(),
        teams: teams.len(),
        venues: venues.len(),
    }
}

// ============================================================================
// NOTICES
// ============================================================================

/// A section has nothing to show. Reported to the user, never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    NoMatchupData,
    SameTeamSelected,
    NoCloseMatch,
    NoSelection,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoMatchupData => "No data for this matchup.",
            Notice::SameTeamSelected => "Choose two different teams.",
            Notice::NoCloseMatch => "No close match found for this season.",
            Notice::NoSelection => "Nothing selected: no players or teams available.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ============================================================================
// PLAYER VS PLAYER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub batter: String,
    pub bowler: String,
    pub runs: u64,
    pub balls: u64,
    pub dismissals: u64,
    pub strike_rate: f64,
    pub fours: u64,
    pub sixes: u64,
}

/// Runs per 100 balls, rounded to 2 places; 0 when no balls were faced
pub fn strike_rate(runs: u64, balls: u64) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    let rate = runs as f64 / balls as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

pub fn player_vs_player(
    deliveries: &[&Delivery],
    batter: &str,
    bowler: &str,
) -> Result<MatchupStats, Notice> {
    let faced: Vec<&Delivery> = deliveries
        .iter()
        .copied()
        .filter(|d| d.batter == batter && d.bowler == bowler)
        .collect();

    if faced.is_empty() {
        return Err(Notice::NoMatchupData);
    }

    let runs: u64 = faced.iter().map(|d| u64::from(d.batsman_runs)).sum();
    let balls = faced.len() as u64;
    let count = |pred: fn(&Delivery) -> bool| faced.iter().filter(|d| pred(d)).count() as u64;

    Ok(MatchupStats {
        batter: batter.to_string(),
        bowler: bowler.to_string(),
        runs,
        balls,
        dismissals: faced
            .iter()
            .filter(|d| d.player_dismissed.as_deref() == Some(batter))
            .count() as u64,
        strike_rate: strike_rate(runs, balls),
        fours: count(Delivery::is_four),
        sixes: count(Delivery::is_six),
    })
}

// ============================================================================
// HEAD TO HEAD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,
    pub total: u64,
    pub team_a_wins: u64,
    pub team_b_wins: u64,
    /// Ties, no results and abandoned matches
    pub ties_or_other: u64,
}

impl HeadToHead {
    /// Pie slices: team A, team B, tie/other
    pub fn slices(&self) -> [(&str, u64); 3] {
        [
            (self.team_a.as_str(), self.team_a_wins),
            (self.team_b.as_str(), self.team_b_wins),
            ("Tie/Other", self.ties_or_other),
        ]
    }
}

pub fn head_to_head(matches: &[&Match], team_a: &str, team_b: &str) -> Result<HeadToHead, Notice> {
    if team_a == team_b {
        return Err(Notice::SameTeamSelected);
    }

    let played: Vec<&Match> = matches
        .iter()
        .copied()
        .filter(|m| m.is_between(team_a, team_b))
        .collect();

    let total = played.len() as u64;
    let team_a_wins = played.iter().filter(|m| m.won_by(team_a)).count() as u64;
    let team_b_wins = played.iter().filter(|m| m.won_by(team_b)).count() as u64;

    Ok(HeadToHead {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        total,
        team_a_wins,
        team_b_wins,
        ties_or_other: total - team_a_wins - team_b_wins,
    })
}

// ============================================================================
// THRILLER
// ============================================================================

/// Closest normally-decided finish; the earliest row wins a tie on margin.
/// Missing margins rank after every known one.
pub fn thriller<'a>(matches: &[&'a Match]) -> Result<&'a Match, Notice> {
    let normal = || matches.iter().copied().filter(|m| m.is_normal_result());

    normal()
        .filter_map(|m| m.result_margin.map(|margin| (margin, m)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, m)| m)
        .or_else(|| normal().next())
        .ok_or(Notice::NoCloseMatch)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SeasonView;
    use crate::testing::{delivery, fixture_dataset, match_row, wicket};

    fn names(ranked: &[Ranked]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    fn assert_ranked(ranked: &[Ranked], limit: usize) {
        assert!(ranked.len() <= limit, "{} entries > top-{}", ranked.len(), limit);
        assert!(
            ranked.windows(2).all(|w| w[0].value >= w[1].value),
            "not sorted: {:?}",
            ranked
        );
    }

    #[test]
    fn test_top_run_scorers() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let top = top_run_scorers(&view.deliveries, HEADLINE_TOP_N);

        assert_ranked(&top, HEADLINE_TOP_N);
        assert_eq!(
            top,
            vec![
                Ranked::new("MS Dhoni", 17),
                Ranked::new("AD Russell", 12),
                Ranked::new("RG Sharma", 11),
            ]
        );
    }

    #[test]
    fn test_top_n_truncates() {
        let deliveries: Vec<Delivery> = (0..15)
            .map(|i| delivery(1, &format!("Batter {:02}", i), "X", i % 7, i % 7))
            .collect();
        let refs: Vec<&Delivery> = deliveries.iter().collect();

        for limit in [1, HEADLINE_TOP_N, LEADERBOARD_TOP_N] {
            assert_ranked(&top_run_scorers(&refs, limit), limit);
        }
        assert_eq!(top_run_scorers(&refs, LEADERBOARD_TOP_N).len(), LEADERBOARD_TOP_N);
        assert!(top_run_scorers(&[], LEADERBOARD_TOP_N).is_empty());
    }

    #[test]
    fn test_wickets_exclude_non_bowler_dismissals() {
        let deliveries = vec![
            wicket(1, "A", "Runout Bowler", "run out"),
            wicket(1, "B", "Runout Bowler", "retired hurt"),
            wicket(1, "C", "Runout Bowler", "obstructing the field"),
            wicket(1, "D", "Real Bowler", "caught"),
            wicket(1, "E", "Real Bowler", "stumped"),
            delivery(1, "F", "Runout Bowler", 0, 0),
        ];
        let refs: Vec<&Delivery> = deliveries.iter().collect();

        let top = top_wicket_takers(&refs, LEADERBOARD_TOP_N);

        assert_eq!(top, vec![Ranked::new("Real Bowler", 2)]);
        assert!(!is_bowler_wicket(&deliveries[0]));
        assert!(!is_bowler_wicket(&deliveries[5]));
    }

    #[test]
    fn test_season_wicket_takers() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let top = top_wicket_takers(&view.deliveries, HEADLINE_TOP_N);

        assert_eq!(
            top,
            vec![Ranked::new("JJ Bumrah", 2), Ranked::new("DL Chahar", 1)]
        );
        assert!(!names(&top).contains(&"SL Malinga"));
    }

    #[test]
    fn test_wins_and_awards() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let wins = wins_per_team(&view.matches);
        assert_eq!(
            names(&wins),
            vec!["Chennai Super Kings", "Kolkata Knight Riders", "Mumbai Indians"]
        );
        assert!(wins.iter().all(|r| r.value == 1));

        let awards = most_player_of_match(&view.matches, HEADLINE_TOP_N);
        assert_eq!(names(&awards), vec!["AD Russell", "JJ Bumrah", "MS Dhoni"]);
    }

    #[test]
    fn test_six_hitters_and_dot_balls() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let sixes = six_hitters(&view.deliveries, LEADERBOARD_TOP_N);
        assert_eq!(
            sixes,
            vec![
                Ranked::new("AD Russell", 2),
                Ranked::new("MS Dhoni", 2),
                Ranked::new("RG Sharma", 1),
            ]
        );

        // A wide off Malinga (0 off the bat, 1 total) is not a dot ball
        let dots = dot_ball_bowlers(&view.deliveries, LEADERBOARD_TOP_N);
        assert_eq!(
            dots,
            vec![
                Ranked::new("JJ Bumrah", 2),
                Ranked::new("DL Chahar", 1),
                Ranked::new("SL Malinga", 1),
            ]
        );
    }

    #[test]
    fn test_season_overview() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let overview = season_overview(&view.matches);

        assert_eq!(
            overview,
            SeasonOverview {
                matches: 4,
                cities: 3,
                teams: 3,
                venues: 3,
            }
        );
        assert_eq!(season_overview(&[]), SeasonOverview::default());
    }

    #[test]
    fn test_strike_rate() {
        assert_eq!(strike_rate(0, 0), 0.0);
        assert_eq!(strike_rate(17, 0), 0.0);
        assert_eq!(strike_rate(6, 4), 150.0);
        assert_eq!(strike_rate(1, 3), 33.33);
        assert_eq!(strike_rate(2, 3), 66.67);
    }

    #[test]
    fn test_player_vs_player_scenario() {
        let deliveries = vec![delivery(1, "A", "B", 1, 1), delivery(1, "A", "B", 4, 4)];
        let refs: Vec<&Delivery> = deliveries.iter().collect();

        let stats = player_vs_player(&refs, "A", "B").unwrap();

        assert_eq!(stats.runs, 5);
        assert_eq!(stats.balls, 2);
        assert_eq!(stats.strike_rate, 250.0);
        assert_eq!(stats.fours, 1);
        assert_eq!(stats.sixes, 0);
        assert_eq!(stats.dismissals, 0);
    }

    #[test]
    fn test_player_vs_player_counts_run_outs_as_dismissals() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        let stats = player_vs_player(&view.deliveries, "MS Dhoni", "SL Malinga").unwrap();

        assert_eq!(stats.runs, 5);
        assert_eq!(stats.balls, 4);
        assert_eq!(stats.dismissals, 1);
        assert_eq!(stats.strike_rate, 125.0);
        assert_eq!(stats.fours, 1);
    }

    #[test]
    fn test_player_vs_player_no_data() {
        let dataset = fixture_dataset();
        let view = SeasonView::new(&dataset, "2019");

        assert_eq!(
            player_vs_player(&view.deliveries, "AD Russell", "SL Malinga"),
            Err(Notice::NoMatchupData)
        );
    }

    #[test]
    fn test_head_to_head_totals_add_up() {
        let dataset = fixture_dataset();
        let all: Vec<&Match> = dataset.matches.iter().collect();
        let teams = crate::filters::teams(&dataset);

        for a in &teams {
            for b in teams.iter().filter(|b| *b != a) {
                let h2h = head_to_head(&all, a, b).unwrap();
                assert_eq!(h2h.team_a_wins + h2h.team_b_wins + h2h.ties_or_other, h2h.total);
            }
        }

        let season = SeasonView::new(&dataset, "2019");
        let h2h = head_to_head(&season.matches, "Mumbai Indians", "Chennai Super Kings").unwrap();
        assert_eq!(h2h.total, 3);
        assert_eq!(h2h.team_a_wins, 1);
        assert_eq!(h2h.team_b_wins, 1);
        assert_eq!(h2h.ties_or_other, 1);

        let h2h = head_to_head(&all, "Mumbai Indians", "Chennai Super Kings").unwrap();
        assert_eq!(h2h.total, 4);
        assert_eq!(h2h.team_b_wins, 2);
    }

    #[test]
    fn test_head_to_head_same_team_is_skipped() {
        let dataset = fixture_dataset();
        let all: Vec<&Match> = dataset.matches.iter().collect();

        assert_eq!(head_to_head(&all, "X", "X"), Err(Notice::SameTeamSelected));
    }

    #[test]
    fn test_head_to_head_no_meetings() {
        let h2h = head_to_head(&[], "Gujarat Lions", "Pune Warriors").unwrap();

        assert_eq!(h2h.total, 0);
        assert_eq!(h2h.slices()[2], ("Tie/Other", 0));
    }

    #[test]
    fn test_thriller_picks_smallest_margin() {
        let mut matches = Vec::new();
        for (id, margin) in [(1, 5.0), (2, 2.0), (3, 9.0)] {
            let mut m = match_row(id, "2020", "X", "Y", Some("X"));
            m.result_margin = Some(margin);
            matches.push(m);
        }
        let refs: Vec<&Match> = matches.iter().collect();

        assert_eq!(thriller(&refs).unwrap().id, 2);
    }

    #[test]
    fn test_thriller_ignores_ties_and_missing_margins() {
        let dataset = fixture_dataset();

        let season = SeasonView::new(&dataset, "2020/21");
        assert_eq!(thriller(&season.matches).unwrap().id, 6);

        let mut tie = match_row(1, "2020", "X", "Y", Some("X"));
        tie.result = Some("tie".to_string());
        tie.result_margin = Some(0.0);
        let washout = match_row(2, "2020", "X", "Y", None);
        assert_eq!(thriller(&[&tie, &washout]), Err(Notice::NoCloseMatch));
    }

    #[test]
    fn test_thriller_falls_back_to_unknown_margin() {
        let mut unknown = match_row(1, "2020", "X", "Y", Some("X"));
        unknown.result_margin = None;
        assert_eq!(thriller(&[&unknown]).unwrap().id, 1);

        let mut close = match_row(2, "2020", "X", "Y", Some("Y"));
        close.result_margin = Some(1.0);
        assert_eq!(thriller(&[&unknown, &close]).unwrap().id, 2);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::NoMatchupData.to_string(), "No data for this matchup.");
        assert_eq!(Notice::SameTeamSelected.to_string(), "Choose two different teams.");
    }
}
