use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ipl_dashboard::{
    build_report, DashboardReport, Dataset, FilterChoices, HeadToHeadScope, Outcome, Ranked,
    Selection,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    TopPerformers,
    Matchups,
    Leaders,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Overview, Page::TopPerformers, Page::Matchups, Page::Leaders];

    pub fn next(&self) -> Self {
        match self {
            Page::Overview => Page::TopPerformers,
            Page::TopPerformers => Page::Matchups,
            Page::Matchups => Page::Leaders,
            Page::Leaders => Page::Overview,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Overview => Page::Leaders,
            Page::TopPerformers => Page::Overview,
            Page::Matchups => Page::TopPerformers,
            Page::Leaders => Page::Matchups,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Season Overview",
            Page::TopPerformers => "Top Performers",
            Page::Matchups => "Matchups",
            Page::Leaders => "Leaders",
        }
    }
}

/// Step through `domain` from `current`, wrapping at both ends
fn cycle(domain: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if domain.is_empty() {
        return None;
    }
    let len = domain.len();
    let i = match current.and_then(|c| domain.iter().position(|d| d == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(domain[i].clone())
}

pub struct App<'a> {
    dataset: &'a Dataset,
    pub current_page: Page,
    pub choices: FilterChoices,
    pub selection: Selection,
    pub report: DashboardReport,
}

impl<'a> App<'a> {
    pub fn new(dataset: &'a Dataset, selection: Selection) -> Result<Self> {
        let (selection, choices) = selection.resolve(dataset)?;
        let report = build_report(dataset, &selection)?;

        Ok(Self {
            dataset,
            current_page: Page::Overview,
            choices,
            selection,
            report,
        })
    }

    fn refresh(&mut self) -> Result<()> {
        self.report = build_report(self.dataset, &self.selection)?;
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// New season: batter and bowler domains change, so both reset to their first entry
    pub fn cycle_season(&mut self, forward: bool) -> Result<()> {
        let Some(season) = cycle(&self.choices.seasons, Some(self.selection.season.as_str()), forward)
        else {
            return Ok(());
        };

        self.choices = FilterChoices::for_season(self.dataset, &season)?;
        self.selection.season = season;
        self.selection.batter = None;
        self.selection.bowler = None;
        self.selection = self.selection.clone().with_defaults(&self.choices);
        self.refresh()
    }

    pub fn cycle_batter(&mut self, forward: bool) -> Result<()> {
        self.selection.batter = cycle(&self.choices.batters, self.selection.batter.as_deref(), forward);
        self.refresh()
    }

    pub fn cycle_bowler(&mut self, forward: bool) -> Result<()> {
        self.selection.bowler = cycle(&self.choices.bowlers, self.selection.bowler.as_deref(), forward);
        self.refresh()
    }

    pub fn cycle_team_a(&mut self, forward: bool) -> Result<()> {
        self.selection.team_a = cycle(&self.choices.teams, self.selection.team_a.as_deref(), forward);
        self.refresh()
    }

    pub fn cycle_team_b(&mut self, forward: bool) -> Result<()> {
        self.selection.team_b = cycle(&self.choices.teams, self.selection.team_b.as_deref(), forward);
        self.refresh()
    }

    pub fn toggle_scope(&mut self) -> Result<()> {
        self.selection.head_to_head_scope = match self.selection.head_to_head_scope {
            HeadToHeadScope::AllSeasons => HeadToHeadScope::Season,
            HeadToHeadScope::Season => HeadToHeadScope::AllSeasons,
        };
        self.refresh()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab => app.next_page(),
            KeyCode::BackTab => app.previous_page(),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => app.next_page(),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => app.previous_page(),
            KeyCode::Char(']') => app.cycle_season(true)?,
            KeyCode::Char('[') => app.cycle_season(false)?,
            KeyCode::Char('b') => app.cycle_batter(true)?,
            KeyCode::Char('B') => app.cycle_batter(false)?,
            KeyCode::Char('w') => app.cycle_bowler(true)?,
            KeyCode::Char('W') => app.cycle_bowler(false)?,
            KeyCode::Char('a') => app.cycle_team_a(true)?,
            KeyCode::Char('A') => app.cycle_team_a(false)?,
            KeyCode::Char('t') => app.cycle_team_b(true)?,
            KeyCode::Char('T') => app.cycle_team_b(false)?,
            KeyCode::Char('h') => app.toggle_scope()?,
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(3), // Current filters
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_filters(f, chunks[1], app);

    match app.current_page {
        Page::Overview => render_overview(f, chunks[2], app),
        Page::TopPerformers => render_top_performers(f, chunks[2], app),
        Page::Matchups => render_matchups(f, chunks[2], app),
        Page::Leaders => render_leaders(f, chunks[2], app),
    }

    render_status_bar(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "🏏 IPL Dashboard  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let header = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let s = &app.selection;
    let label = Style::default().fg(Color::Yellow);
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let scope = match s.head_to_head_scope {
        HeadToHeadScope::AllSeasons => "all seasons",
        HeadToHeadScope::Season => "this season",
    };

    let line = Line::from(vec![
        Span::styled(" 📅 Season ", label),
        Span::raw(s.season.clone()),
        Span::styled("  🧢 Batsman ", label),
        Span::raw(or_dash(&s.batter)),
        Span::styled("  🎯 Bowler ", label),
        Span::raw(or_dash(&s.bowler)),
        Span::styled("  🏏 Teams ", label),
        Span::raw(format!("{} v {}", or_dash(&s.team_a), or_dash(&s.team_b))),
        Span::styled(format!(" ({})", scope), Style::default().fg(Color::DarkGray)),
    ]);

    let filters = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Filters "),
    );

    f.render_widget(filters, area);
}

/// What the names on a bar chart refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarLabel {
    Team,
    Player,
}

/// Short bar label: team initials, or a player's surname
fn short_label(name: &str, kind: BarLabel) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match kind {
        BarLabel::Team if words.len() > 1 => {
            words.iter().filter_map(|w| w.chars().next()).collect()
        }
        _ => words.last().map(|w| w.to_string()).unwrap_or_default(),
    }
}

fn render_bar_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    ranked: &[Ranked],
    kind: BarLabel,
    color: Color,
) {
    let labels: Vec<String> = ranked.iter().map(|r| short_label(&r.name, kind)).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(ranked)
        .map(|(label, r)| (label.as_str(), r.value))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", title)),
        )
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD));

    f.render_widget(chart, area);
}

fn metric(label: &str, value: impl ToString) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {}: ", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.to_string()),
    ])
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let o = &app.report.overview;
    let metrics = Paragraph::new(vec![Line::from(vec![
        Span::styled("  Matches ", Style::default().fg(Color::Cyan)),
        Span::styled(o.matches.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("    Cities ", Style::default().fg(Color::Cyan)),
        Span::styled(o.cities.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("    Teams ", Style::default().fg(Color::Cyan)),
        Span::styled(o.teams.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("    Venues ", Style::default().fg(Color::Cyan)),
        Span::styled(o.venues.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" 📊 Season Overview - {} ", app.selection.season)),
    );
    f.render_widget(metrics, chunks[0]);

    render_bar_chart(
        f,
        chunks[1],
        "🏆 Wins Per Team",
        &app.report.wins_per_team,
        BarLabel::Team,
        Color::Green,
    );
}

fn render_top_performers(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    render_bar_chart(
        f,
        chunks[0],
        "🟠 Orange Cap - Most Runs",
        &app.report.orange_cap,
        BarLabel::Player,
        Color::LightRed,
    );
    render_bar_chart(
        f,
        chunks[1],
        "🟣 Purple Cap - Most Wickets",
        &app.report.purple_cap,
        BarLabel::Player,
        Color::Magenta,
    );
    render_bar_chart(
        f,
        chunks[2],
        "🏆 Most Player of the Match Awards",
        &app.report.player_of_match,
        BarLabel::Player,
        Color::Yellow,
    );
}

fn notice_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  ⚠️  {}", message),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
    ))
}

fn render_matchups(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let pvp = match &app.report.matchup {
        Outcome::Ok { data: m } => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {} vs {}", m.batter, m.bowler),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            metric("Runs", m.runs),
            metric("Balls", m.balls),
            metric("Dismissals", m.dismissals),
            metric("Strike Rate", format!("{:.2}", m.strike_rate)),
            Line::from(""),
            metric("🏏 Fours", m.fours),
            metric("🔥 Sixes", m.sixes),
        ],
        Outcome::Notice { message, .. } => vec![Line::from(""), notice_line(message)],
    };
    f.render_widget(panel(pvp, " 🆚 Player vs Player "), chunks[0]);

    let h2h = match &app.report.head_to_head {
        Outcome::Ok { data: h } => {
            let mut lines = vec![Line::from("")];
            for (name, wins) in h.slices() {
                let pct = if h.total > 0 { wins * 100 / h.total } else { 0 };
                lines.push(metric(name, format!("{} ({}%)", wins, pct)));
            }
            lines.push(Line::from(""));
            lines.push(metric("Played", h.total));
            lines
        }
        Outcome::Notice { message, .. } => vec![Line::from(""), notice_line(message)],
    };
    f.render_widget(panel(h2h, " 🏟️ Head-to-Head Battle "), chunks[1]);

    let thriller = match &app.report.thriller {
        Outcome::Ok { data: t } => vec![
            Line::from(""),
            metric("🏟️ Venue", &t.venue),
            metric("📅 Date", &t.date),
            metric("🆚 Match", format!("{} vs {}", t.team1, t.team2)),
            metric("🏆 Winner", t.winner.as_deref().unwrap_or("-")),
            metric(
                "📊 Result Margin",
                t.result_margin.map_or_else(|| "-".to_string(), |v| v.to_string()),
            ),
        ],
        Outcome::Notice { message, .. } => vec![Line::from(""), notice_line(message)],
    };
    f.render_widget(panel(thriller, " ⚡ Thriller of the Season "), chunks[2]);
}

fn panel(lines: Vec<Line<'static>>, title: &str) -> Paragraph<'static> {
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    )
}

fn ranking_table<'r>(title: &str, unit: &str, ranked: &'r [Ranked]) -> Table<'r> {
    let header_cells = ["#", "Player", unit].into_iter().map(|h| {
        Cell::from(h.to_string()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = ranked.iter().enumerate().map(|(i, r)| {
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(r.name.as_str()),
            Cell::from(r.value.to_string()),
        ])
    });

    Table::new(
        rows,
        [Constraint::Length(3), Constraint::Min(20), Constraint::Length(7)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", title)),
    )
}

fn render_leaders(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let r = &app.report;
    f.render_widget(ranking_table("🏏 Top Run Scorers", "Runs", &r.top_run_scorers), top[0]);
    f.render_widget(ranking_table("🎯 Top Wicket Takers", "Wkts", &r.top_wicket_takers), top[1]);
    f.render_widget(ranking_table("💣 Top Six Hitters", "Sixes", &r.six_hitters), bottom[0]);
    f.render_widget(ranking_table("🧊 Dot Ball Specialists", "Dots", &r.dot_ball_bowlers), bottom[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let status_spans = vec![
        Span::styled(" Tab", key),
        Span::raw(" Page | "),
        Span::styled("[ ]", key),
        Span::raw(" Season | "),
        Span::styled("b/B", key),
        Span::raw(" Batsman | "),
        Span::styled("w/W", key),
        Span::raw(" Bowler | "),
        Span::styled("a/A t/T", key),
        Span::raw(" Teams | "),
        Span::styled("h", key),
        Span::raw(" H2H scope | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
