// Shared fixtures for unit tests

use crate::data::{Dataset, Delivery, Match};

pub fn match_row(id: u64, season: &str, team1: &str, team2: &str, winner: Option<&str>) -> Match {
    Match {
        id,
        season: season.to_string(),
        city: Some("Mumbai".to_string()),
        venue: "Wankhede Stadium".to_string(),
        date: "2019-04-01".to_string(),
        team1: team1.to_string(),
        team2: team2.to_string(),
        winner: winner.map(str::to_string),
        result: Some(if winner.is_some() { "normal" } else { "no result" }.to_string()),
        result_margin: winner.map(|_| 10.0),
        player_of_match: None,
        match_type: Some("League".to_string()),
        toss_winner: None,
        toss_decision: None,
    }
}

pub fn delivery(match_id: u64, batter: &str, bowler: &str, batsman_runs: u32, total_runs: u32) -> Delivery {
    Delivery {
        match_id,
        inning: Some(1),
        batting_team: None,
        bowling_team: None,
        over: None,
        ball: None,
        batter: batter.to_string(),
        bowler: bowler.to_string(),
        batsman_runs,
        extra_runs: Some(total_runs.saturating_sub(batsman_runs)),
        total_runs,
        dismissal_kind: None,
        player_dismissed: None,
    }
}

pub fn wicket(match_id: u64, batter: &str, bowler: &str, kind: &str) -> Delivery {
    Delivery {
        dismissal_kind: Some(kind.to_string()),
        player_dismissed: Some(batter.to_string()),
        ..delivery(match_id, batter, bowler, 0, 0)
    }
}

/// Two seasons of a small league.
///
/// 2019: MI beat CSK by 5, CSK beat MI by 2, KKR beat MI by 9, one CSK v MI washout.
/// 2020/21: a DC v KXIP tie and CSK beating MI by 5.
pub fn fixture_dataset() -> Dataset {
    let mi = "Mumbai Indians";
    let csk = "Chennai Super Kings";
    let kkr = "Kolkata Knight Riders";

    let mut m1 = match_row(1, "2019", mi, csk, Some(mi));
    m1.result_margin = Some(5.0);
    m1.player_of_match = Some("JJ Bumrah".to_string());
    m1.venue = "Wankhede Stadium".to_string();

    let mut m2 = match_row(2, "2019", csk, mi, Some(csk));
    m2.result_margin = Some(2.0);
    m2.player_of_match = Some("MS Dhoni".to_string());
    m2.city = Some("Chennai".to_string());
    m2.venue = "MA Chidambaram Stadium".to_string();
    m2.date = "2019-04-03".to_string();

    let mut m3 = match_row(3, "2019", mi, kkr, Some(kkr));
    m3.result_margin = Some(9.0);
    m3.player_of_match = Some("AD Russell".to_string());
    m3.city = Some("Kolkata".to_string());
    m3.venue = "Eden Gardens".to_string();

    let m4 = match_row(4, "2019", csk, mi, None);

    let mut m5 = match_row(5, "2020/21", "Delhi Capitals", "Kings XI Punjab", Some("Delhi Capitals"));
    m5.result = Some("tie".to_string());
    m5.result_margin = None;
    m5.city = Some("Dubai".to_string());
    m5.player_of_match = Some("MP Stoinis".to_string());

    let mut m6 = match_row(6, "2020/21", csk, mi, Some(csk));
    m6.result_margin = Some(5.0);
    m6.city = Some("Abu Dhabi".to_string());
    m6.player_of_match = Some("AT Rayudu".to_string());

    let deliveries = vec![
        // Match 1
        delivery(1, "RG Sharma", "DL Chahar", 4, 4),
        delivery(1, "RG Sharma", "DL Chahar", 6, 6),
        wicket(1, "RG Sharma", "DL Chahar", "caught"),
        delivery(1, "RG Sharma", "DL Chahar", 1, 1),
        wicket(1, "MS Dhoni", "JJ Bumrah", "bowled"),
        delivery(1, "MS Dhoni", "JJ Bumrah", 6, 6),
        delivery(1, "MS Dhoni", "JJ Bumrah", 6, 6),
        // Match 2
        delivery(2, "MS Dhoni", "SL Malinga", 1, 1),
        wicket(2, "MS Dhoni", "SL Malinga", "run out"),
        delivery(2, "MS Dhoni", "SL Malinga", 4, 4),
        delivery(2, "MS Dhoni", "SL Malinga", 0, 1),
        // Match 3
        delivery(3, "AD Russell", "JJ Bumrah", 6, 6),
        delivery(3, "AD Russell", "JJ Bumrah", 6, 6),
        wicket(3, "AD Russell", "JJ Bumrah", "lbw"),
        // Match 6
        delivery(6, "RG Sharma", "DL Chahar", 2, 2),
        delivery(6, "RG Sharma", "DL Chahar", 0, 0),
    ];

    Dataset::new(vec![m1, m2, m3, m4, m5, m6], deliveries)
}
