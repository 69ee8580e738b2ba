//! Watch command implementation - Interactive TUI viewer.

use super::{CliError, load_map};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lighthouses::arena::{Arena, MatchConfig, RoundReport, TurnSummary};
use lighthouses::game::{Coord, GameSnapshot, PlayerId};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::Path;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded, the bots fail to start or
/// the TUI fails.
pub(crate) fn execute(
    map_path: &Path,
    bots: &[String],
    config: MatchConfig,
    speed: u64,
) -> Result<(), CliError> {
    let map = load_map(map_path)?;
    let mut arena = Arena::new(&map, bots, config)?;

    let outcome = run_tui(&mut arena, speed);
    arena.close();
    outcome
}

/// App state for the TUI.
struct App<'a> {
    arena: &'a mut Arena,
    snapshot: GameSnapshot,
    last_report: Option<RoundReport>,
    error: Option<String>,
    paused: bool,
    speed_ms: u64,
    last_step: Instant,
}

impl<'a> App<'a> {
    fn new(arena: &'a mut Arena, speed_ms: u64) -> Self {
        let snapshot = arena.state().snapshot();
        Self {
            arena,
            snapshot,
            last_report: None,
            error: None,
            paused: true, // Start paused
            speed_ms,
            last_step: Instant::now(),
        }
    }

    fn is_over(&self) -> bool {
        self.error.is_some() || self.arena.is_finished()
    }

    fn step_forward(&mut self) {
        if self.is_over() {
            return;
        }
        match self.arena.play_round() {
            Ok(report) => self.last_report = Some(report),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.snapshot = self.arena.state().snapshot();
        self.last_step = Instant::now();
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(100).max(50);
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = (self.speed_ms + 100).min(2000);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused
            && !self.is_over()
            && self.last_step.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

fn run_tui(arena: &mut Arena, speed: u64) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(arena, speed);
    let looped = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    looped?;
    match app.error {
        Some(message) => Err(CliError::new(message)),
        None => Ok(()),
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<'_>,
) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if app.should_auto_step() {
            app.step_forward();
        }

        // Handle input with timeout
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Right | KeyCode::Char('l') => {
                    app.paused = true;
                    app.step_forward();
                }
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], &app.snapshot);
    render_stats(f, main_chunks[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App<'_>) {
    let status = if app.error.is_some() {
        "ABORTED"
    } else if app.is_over() {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Lighthouses | Round {}/{} | {} | Speed: {}ms ",
        app.snapshot.round,
        app.arena.config().rounds,
        status,
        app.speed_ms
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, snap: &GameSnapshot) {
    let mut lines: Vec<Line> = Vec::new();

    let visible_width = area.width.saturating_sub(2).min(snap.width);
    let visible_height = area.height.saturating_sub(2).min(snap.height);

    // Row 0 is the bottom of the island
    for y in (0..visible_height).rev() {
        let spans: Vec<Span> = (0..visible_width)
            .map(|x| cell_span(snap, Coord::new(x, y)))
            .collect();
        lines.push(Line::from(spans));
    }

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Island "));

    f.render_widget(map_widget, area);
}

fn cell_span(snap: &GameSnapshot, pos: Coord) -> Span<'static> {
    let row = usize::from(pos.y);
    let col = usize::from(pos.x);
    if snap.island[row][col] == 0 {
        return Span::styled("~", Style::default().fg(Color::Blue));
    }

    let mut style = Style::default();
    if let Some(owner) = snap.territory_owner(pos) {
        style = style.bg(player_color(owner)).fg(Color::Black);
    }

    if let Some(player) = snap.players.iter().find(|p| p.position == pos) {
        let digit = char::from_digit(u32::from(player.id) % 10, 10).unwrap_or('?');
        return Span::styled(
            digit.to_string(),
            style.fg(player_color(player.id)).add_modifier(Modifier::BOLD),
        );
    }
    if let Some(lh) = snap.lighthouse_at(pos) {
        let color = lh.owner.map_or(Color::White, player_color);
        return Span::styled("!", style.fg(color).add_modifier(Modifier::BOLD));
    }

    let ch = match snap.energy[row][col] {
        0 => " ",
        1..=24 => ".",
        25..=49 => ":",
        50..=74 => "+",
        _ => "*",
    };
    Span::styled(ch, style.fg(Color::DarkGray))
}

fn render_stats(f: &mut Frame, area: Rect, app: &App<'_>) {
    let snap = &app.snapshot;
    let mut lines = vec![Line::from("")];

    for player in &snap.players {
        let color = player_color(player.id);
        let owned = snap
            .lighthouses
            .iter()
            .filter(|lh| lh.owner == Some(player.id))
            .count();

        lines.push(Line::from(vec![
            Span::styled(
                format!("Player {} ", player.id),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({})", player.name)),
        ]));
        lines.push(Line::from(format!("  Score: {}", player.score)));
        lines.push(Line::from(format!(
            "  Energy: {}  Keys: {}",
            player.energy,
            player.keys.len()
        )));
        lines.push(Line::from(format!("  Lighthouses: {owned}")));

        let turn = app
            .last_report
            .as_ref()
            .and_then(|r| r.players.get(usize::from(player.id)))
            .map(|p| describe_turn(&p.turn));
        if let Some(turn) = turn {
            lines.push(Line::from(format!("  Last: {turn}")));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(format!(
        "Connections: {}  Triangles: {}",
        snap.connections.len(),
        snap.triangles.len()
    )));
    if let Some(error) = &app.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn describe_turn(turn: &TurnSummary) -> String {
    match turn {
        TurnSummary::Applied { command } => (*command).to_string(),
        TurnSummary::Rejected { message } => format!("rejected: {message}"),
        TurnSummary::Inactive => "inactive".to_string(),
        TurnSummary::Faulted { message } => format!("faulted: {message}"),
    }
}

fn player_color(id: PlayerId) -> Color {
    match id {
        0 => Color::Red,
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Magenta,
        5 => Color::Cyan,
        6 => Color::LightRed,
        7 => Color::LightBlue,
        _ => Color::White,
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App<'_>) {
    let controls = if app.is_over() {
        " [q] Quit "
    } else {
        " [q] Quit  [Space] Pause  [→] Step  [+/-] Speed "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
