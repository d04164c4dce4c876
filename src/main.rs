// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ipl_dashboard::{
    build_report, filters, init_tracing, render_text, DataArgs, DataError, Dataset,
    HeadToHeadScope, Selection,
};

#[derive(Debug, Parser)]
#[clap(name = "ipl-dashboard", about = "IPL season dashboard", version)]
struct Cli {
    #[clap(flatten)]
    data: DataArgs,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal dashboard (the default).
    Tui {
        #[clap(flatten)]
        selection: SelectionArgs,
    },

    /// Print every dashboard section for one selection.
    Report {
        #[clap(flatten)]
        selection: SelectionArgs,

        /// Output the report as JSON instead of text.
        #[clap(long)]
        json: bool,
    },

    /// List the seasons present in matches.csv.
    Seasons,
}

/// Initial filter state; anything unset defaults to the first valid choice
#[derive(Debug, Clone, Default, Args)]
struct SelectionArgs {
    /// Season label, e.g. `2019` or `2020/21`.
    #[clap(long, short)]
    season: Option<String>,

    /// Batsman for the player-vs-player section.
    #[clap(long)]
    batter: Option<String>,

    /// Bowler for the player-vs-player section.
    #[clap(long)]
    bowler: Option<String>,

    /// First team of the head-to-head section.
    #[clap(long)]
    team_a: Option<String>,

    /// Second team of the head-to-head section.
    #[clap(long)]
    team_b: Option<String>,

    /// Count head-to-head over the selected season only.
    #[clap(long = "h2h-season-only")]
    h2h_season_only: bool,
}

impl SelectionArgs {
    fn to_selection(&self, dataset: &Dataset) -> Result<Selection> {
        let season = filters::resolve_season(dataset, self.season.as_deref())?;

        let selection = Selection {
            season,
            batter: self.batter.clone(),
            bowler: self.bowler.clone(),
            team_a: self.team_a.clone(),
            team_b: self.team_b.clone(),
            head_to_head_scope: if self.h2h_season_only {
                HeadToHeadScope::Season
            } else {
                HeadToHeadScope::AllSeasons
            },
        };

        let (selection, _) = selection.resolve(dataset)?;
        Ok(selection)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui {
        selection: SelectionArgs::default(),
    });

    // Log lines on stderr would scribble over the alternate screen
    let default_level = if matches!(command, Command::Tui { .. }) { "warn" } else { "info" };
    init_tracing(default_level);

    let cache = cli.data.cache();
    let dataset = match cache.get_or_load() {
        Ok(dataset) => dataset,
        Err(err @ DataError::MissingFile { .. }) => {
            eprintln!("❌ {}", err);
            eprintln!("   Put matches.csv and deliveries.csv in the data directory,");
            eprintln!("   or pass --data-dir / --matches / --deliveries.");
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("Failed to load dataset"),
    };

    match command {
        Command::Tui { selection } => run_ui_mode(dataset, &selection)?,
        Command::Report { selection, json } => run_report(dataset, &selection, json)?,
        Command::Seasons => {
            for season in filters::seasons(dataset) {
                println!("{}", season);
            }
        }
    }

    Ok(())
}

fn run_report(dataset: &Dataset, args: &SelectionArgs, json: bool) -> Result<()> {
    let selection = args.to_selection(dataset)?;
    let report = build_report(dataset, &selection)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(dataset: &Dataset, args: &SelectionArgs) -> Result<()> {
    let selection = args.to_selection(dataset)?;

    let mut app = ui::App::new(dataset, selection)?;
    ui::run_ui(&mut app)?;

    println!("✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_dataset: &Dataset, _args: &SelectionArgs) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: ipl-dashboard report --season <SEASON>");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::parse_from(["ipl-dashboard"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::parse_from([
            "ipl-dashboard",
            "--data-dir",
            "data",
            "report",
            "--season",
            "2019",
            "--team-a",
            "Mumbai Indians",
            "--h2h-season-only",
            "--json",
        ]);

        match cli.command {
            Some(Command::Report { selection, json }) => {
                assert!(json);
                assert_eq!(selection.season.as_deref(), Some("2019"));
                assert_eq!(selection.team_a.as_deref(), Some("Mumbai Indians"));
                assert!(selection.h2h_season_only);
            }
            other => panic!("expected report command, got {:?}", other),
        }
    }
}
