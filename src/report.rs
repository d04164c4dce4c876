// 🧾 Season Report - every dashboard section for one selection
// The single structure the TUI, CLI and web server render

use crate::data::{Dataset, Match};
use crate::error::Result;
use crate::filters::{resolve_season, HeadToHeadScope, SeasonView, Selection};
use crate::stats::{
    self, HeadToHead, MatchupStats, Notice, Ranked, SeasonOverview, HEADLINE_TOP_N,
    LEADERBOARD_TOP_N,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Instant;
use tracing::debug;

// ============================================================================
// OUTCOME
// ============================================================================

/// A section's value, or the notice shown in its place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { data: T },
    Notice { notice: Notice, message: String },
}

impl<T> Outcome<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Ok { data } => Some(data),
            Outcome::Notice { .. } => None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Notice { notice, .. } => Some(*notice),
        }
    }
}

impl<T> From<std::result::Result<T, Notice>> for Outcome<T> {
    fn from(result: std::result::Result<T, Notice>) -> Self {
        match result {
            Ok(data) => Outcome::Ok { data },
            Err(notice) => Outcome::Notice {
                notice,
                message: notice.message().to_string(),
            },
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrillerMatch {
    pub id: u64,
    pub venue: String,
    pub date: String,
    pub team1: String,
    pub team2: String,
    pub winner: Option<String>,
    pub result_margin: Option<f64>,
}

impl From<&Match> for ThrillerMatch {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id,
            venue: m.venue.clone(),
            date: m
                .parsed_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| m.date.clone()),
            team1: m.team1.clone(),
            team2: m.team2.clone(),
            winner: m.winner.clone(),
            result_margin: m.result_margin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub selection: Selection,
    pub generated_at: DateTime<Utc>,

    pub overview: SeasonOverview,
    pub wins_per_team: Vec<Ranked>,

    // Top performers (headline charts)
    pub orange_cap: Vec<Ranked>,
    pub purple_cap: Vec<Ranked>,
    pub player_of_match: Vec<Ranked>,

    pub matchup: Outcome<MatchupStats>,
    pub head_to_head: Outcome<HeadToHead>,
    pub thriller: Outcome<ThrillerMatch>,

    // Leaderboards
    pub top_run_scorers: Vec<Ranked>,
    pub top_wicket_takers: Vec<Ranked>,
    pub six_hitters: Vec<Ranked>,
    pub dot_ball_bowlers: Vec<Ranked>,
}

/// Run every aggregation for `selection`. Unset players or teams yield
/// [`Notice::NoSelection`] for their section.
pub fn build_report(dataset: &Dataset, selection: &Selection) -> Result<DashboardReport> {
    let started = Instant::now();
    let season = resolve_season(dataset, Some(&selection.season))?;
    let view = SeasonView::new(dataset, &season);

    let matchup = match (&selection.batter, &selection.bowler) {
        (Some(batter), Some(bowler)) => stats::player_vs_player(&view.deliveries, batter, bowler),
        _ => Err(Notice::NoSelection),
    };

    let all_matches: Vec<&Match>;
    let h2h_matches = match selection.head_to_head_scope {
        HeadToHeadScope::AllSeasons => {
            all_matches = dataset.matches.iter().collect();
            &all_matches
        }
        HeadToHeadScope::Season => &view.matches,
    };
    let head_to_head = match (&selection.team_a, &selection.team_b) {
        (Some(a), Some(b)) => stats::head_to_head(h2h_matches, a, b),
        _ => Err(Notice::NoSelection),
    };

    let report = DashboardReport {
        selection: selection.clone(),
        generated_at: Utc::now(),
        overview: stats::season_overview(&view.matches),
        wins_per_team: stats::wins_per_team(&view.matches),
        orange_cap: stats::top_run_scorers(&view.deliveries, HEADLINE_TOP_N),
        purple_cap: stats::top_wicket_takers(&view.deliveries, HEADLINE_TOP_N),
        player_of_match: stats::most_player_of_match(&view.matches, HEADLINE_TOP_N),
        matchup: matchup.into(),
        head_to_head: head_to_head.into(),
        thriller: stats::thriller(&view.matches).map(ThrillerMatch::from).into(),
        top_run_scorers: stats::top_run_scorers(&view.deliveries, LEADERBOARD_TOP_N),
        top_wicket_takers: stats::top_wicket_takers(&view.deliveries, LEADERBOARD_TOP_N),
        six_hitters: stats::six_hitters(&view.deliveries, LEADERBOARD_TOP_N),
        dot_ball_bowlers: stats::dot_ball_bowlers(&view.deliveries, LEADERBOARD_TOP_N),
    };

    debug!(
        season = %season,
        matches = view.matches.len(),
        deliveries = view.deliveries.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "report built"
    );

    Ok(report)
}

// ============================================================================
// TEXT RENDERING
// ============================================================================

fn push_ranking(out: &mut String, title: &str, unit: &str, ranked: &[Ranked]) {
    let _ = writeln!(out, "\n{}", title);
    if ranked.is_empty() {
        let _ = writeln!(out, "   (none)");
        return;
    }
    for (i, entry) in ranked.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<28} {:>5} {}", i + 1, entry.name, entry.value, unit);
    }
}

/// Plain-text rendering used by the `report` subcommand
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    let o = &report.overview;

    let _ = writeln!(out, "📊 Season Overview - {}", report.selection.season);
    let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let _ = writeln!(
        out,
        "Matches: {}   Cities: {}   Teams: {}   Venues: {}",
        o.matches, o.cities, o.teams, o.venues
    );

    push_ranking(&mut out, "🏆 Wins Per Team", "wins", &report.wins_per_team);
    push_ranking(&mut out, "🟠 Orange Cap - Most Runs", "runs", &report.orange_cap);
    push_ranking(&mut out, "🟣 Purple Cap - Most Wickets", "wkts", &report.purple_cap);
    push_ranking(&mut out, "🏆 Most Player of the Match Awards", "awards", &report.player_of_match);

    let _ = writeln!(out, "\n🆚 Player vs Player");
    match &report.matchup {
        Outcome::Ok { data: m } => {
            let _ = writeln!(out, "  {} vs {}", m.batter, m.bowler);
            let _ = writeln!(
                out,
                "  Runs: {}   Balls: {}   Dismissals: {}   Strike Rate: {:.2}",
                m.runs, m.balls, m.dismissals, m.strike_rate
            );
            let _ = writeln!(out, "  Fours: {}   Sixes: {}", m.fours, m.sixes);
        }
        Outcome::Notice { message, .. } => {
            let _ = writeln!(out, "  ⚠️  {}", message);
        }
    }

    let _ = writeln!(out, "\n🏟️ Head-to-Head");
    match &report.head_to_head {
        Outcome::Ok { data: h } => {
            let _ = writeln!(out, "  {} wins: {}", h.team_a, h.team_a_wins);
            let _ = writeln!(out, "  {} wins: {}", h.team_b, h.team_b_wins);
            let _ = writeln!(out, "  Ties/Other: {}   (played {})", h.ties_or_other, h.total);
        }
        Outcome::Notice { message, .. } => {
            let _ = writeln!(out, "  ⚠️  {}", message);
        }
    }

    let _ = writeln!(out, "\n⚡ Thriller of the Season");
    match &report.thriller {
        Outcome::Ok { data: t } => {
            let _ = writeln!(out, "  Venue: {}", t.venue);
            let _ = writeln!(out, "  Date: {}", t.date);
            let _ = writeln!(out, "  Match: {} vs {}", t.team1, t.team2);
            let _ = writeln!(out, "  Winner: {}", t.winner.as_deref().unwrap_or("-"));
            let margin = t.result_margin.map_or_else(|| "-".to_string(), |v| v.to_string());
            let _ = writeln!(out, "  Result Margin: {}", margin);
        }
        Outcome::Notice { message, .. } => {
            let _ = writeln!(out, "  ℹ️  {}", message);
        }
    }

    push_ranking(&mut out, "🏏 Top Run Scorers", "runs", &report.top_run_scorers);
    push_ranking(&mut out, "🎯 Top Wicket Takers", "wkts", &report.top_wicket_takers);
    push_ranking(&mut out, "💣 Top Six Hitters", "sixes", &report.six_hitters);
    push_ranking(&mut out, "🧊 Dot Ball Specialists", "dots", &report.dot_ball_bowlers);

    out
}

// ============================================================================
// TESTS
// ============================================================================
