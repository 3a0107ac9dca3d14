//! Play command implementation - interactive terminal game.

// Screen geometry uses intentional casts between grid and terminal units
#![allow(clippy::cast_sign_loss)]

use super::CliError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::{Duration, Instant};
use tilewar::game::{density_cell, dominant_player, FlagSet, TerrainClass, TIMER_INTERVAL_MS};
use tilewar::{Command, Control, Coord, Direction, GameConfig, GameState, Outcome, PlayerId, Speed};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the terminal fails.
pub(crate) fn execute(config: &GameConfig) -> Result<(), CliError> {
    let mut state = GameState::new(config)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result?;
    println!("Random seed was {}", state.map_seed);
    Ok(())
}

/// Command bound to a key, if any.
pub(crate) fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q' | 'Q') => Command::Quit,
        KeyCode::Char('f') => Command::Faster,
        KeyCode::Char('s') => Command::Slower,
        KeyCode::Char('p') => Command::TogglePause,
        KeyCode::Char('h') | KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Char('k') | KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Char('u') => Command::Move(Direction::UpRight),
        KeyCode::Char('b') => Command::Move(Direction::DownLeft),
        KeyCode::Char(' ') => Command::ToggleFlag,
        KeyCode::Char('x') => Command::ClearFlags,
        KeyCode::Char('c') => Command::ClearHalfFlags,
        KeyCode::Char('r' | 'v') => Command::Build,
        _ => return None,
    };
    Some(command)
}

/// Wait for whichever comes first, the next timer tick or a key, and
/// dispatch it. Redraws only after something changed.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut GameState,
) -> Result<(), CliError> {
    let interval = Duration::from_millis(TIMER_INTERVAL_MS);
    let mut next_tick = Instant::now() + interval;
    let mut dirty = true;

    loop {
        if dirty {
            terminal
                .draw(|f| ui(f, state))
                .map_err(|e| CliError::new(e.to_string()))?;
            dirty = false;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
            && let Some(command) = command_for(key.code)
        {
            if state.apply(command) == Control::Quit {
                break;
            }
            dirty = true;
        }

        if Instant::now() >= next_tick {
            let report = state.timer_tick();
            dirty |= report.advanced || report.evaluated;
            next_tick += interval;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, state: &GameState) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], state);

    let main_chunks = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], state);
    render_stats(f, main_chunks[1], state);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, state: &GameState) {
    let status = match state.outcome {
        Outcome::Victory => "VICTORY",
        Outcome::Defeat => "DEFEAT",
        Outcome::Ongoing if state.speed == Speed::Pause => "PAUSED",
        Outcome::Ongoing => "RUNNING",
    };

    let title = format!(
        " Tilewar | Seed {} | Step {} | {} | Speed: {} ",
        state.map_seed, state.tick, status, state.speed
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, state: &GameState) {
    let view = state.view();
    let grid = view.grid;

    let visible_rows = (i32::from(area.height) - 2).clamp(0, grid.height());
    let mut lines: Vec<Line> = Vec::with_capacity(visible_rows as usize);

    for j in 0..visible_rows {
        let mut spans = vec![Span::raw(" ".repeat(j as usize))];
        for i in 0..grid.width() {
            let c = Coord::new(i, j);
            let [marker, body] = density_cell(&view, c);
            let mut style = Style::default().fg(tile_color(state, c));
            if grid.class_at(c) == TerrainClass::Claimed {
                style = style.add_modifier(Modifier::BOLD);
            }
            if c == view.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{marker}{body}"), style));
        }
        lines.push(Line::from(spans));
    }

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Map "));

    f.render_widget(map_widget, area);
}

fn tile_color(state: &GameState, c: Coord) -> Color {
    let Some(tile) = state.grid.get(c) else {
        return Color::Reset;
    };
    match tile.class {
        TerrainClass::Unusable => Color::Reset,
        TerrainClass::Impassable => Color::Gray,
        TerrainClass::Unclaimed | TerrainClass::Claimed => {
            dominant_player(tile).map_or(Color::DarkGray, player_color)
        }
    }
}

fn render_stats(f: &mut Frame, area: Rect, state: &GameState) {
    let populations = state.populations();
    let mut lines = vec![Line::from("")];

    for country in &state.countries {
        let id = country.id;
        let who = if id == state.controlled {
            "you".to_string()
        } else {
            country
                .autopilot
                .map_or_else(|| "idle".to_string(), |d| d.to_string())
        };
        let citizens = populations[usize::from(id)];
        let status = if citizens == 0 { " [WIPED OUT]" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(
                format!("Player {id} "),
                Style::default().fg(player_color(id)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({who}){status}")),
        ]));

        if citizens > 0 {
            let settlements = state
                .grid
                .iter()
                .filter(|(_, t)| t.class == TerrainClass::Claimed && t.owner == Some(id))
                .count();
            let flags = state.flags.get(usize::from(id)).map_or(0, FlagSet::len);
            lines.push(Line::from(format!("  Citizens: {citizens}")));
            lines.push(Line::from(format!("  Settlements: {settlements}")));
            lines.push(Line::from(format!("  Flags: {flags}")));
        }
        lines.push(Line::from(""));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Countries "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn player_color(id: PlayerId) -> Color {
    match id {
        0 => Color::Yellow,
        1 => Color::Red,
        2 => Color::Blue,
        3 => Color::Green,
        4 => Color::Magenta,
        5 => Color::Cyan,
        6 => Color::LightRed,
        7 => Color::LightBlue,
        _ => Color::White,
    }
}

fn render_footer(f: &mut Frame, area: Rect) {
    let controls = " [q] Quit  [hjkl/arrows] Move  [u/b] Hex diagonal  [Space] Flag  [x/c] Clear all/half  [r/v] Build  [f/s] Speed  [p] Pause ";

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for(KeyCode::Char('Q')), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Up), Some(Command::Move(Direction::Up)));
        assert_eq!(command_for(KeyCode::Char('j')), Some(Command::Move(Direction::Down)));
        assert_eq!(command_for(KeyCode::Char('u')), Some(Command::Move(Direction::UpRight)));
        assert_eq!(command_for(KeyCode::Char('v')), Some(Command::Build));
        assert_eq!(command_for(KeyCode::Char(' ')), Some(Command::ToggleFlag));
        assert_eq!(command_for(KeyCode::Char('z')), None);
        assert_eq!(command_for(KeyCode::Esc), None);
    }
}
