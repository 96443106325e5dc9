//! TUI rendering with ratatui
//!
//! Board grid, keyboard, messages and statistics.

use super::app::{App, InputMode};
use crate::core::{MAX_ROWS, Row, TileState};
use crate::game::{NoticeKind, puzzle_number};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph},
};

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(5),  // Keyboard
            Constraint::Length(3),  // Status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    // Main content area - split horizontally
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_info_panel(f, app, main_chunks[1]);
    render_keyboard(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

/// Tile colours: green, yellow, grey, or plain while unevaluated
#[must_use]
pub fn tile_style(state: TileState) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match state {
        TileState::Correct => base.fg(Color::Black).bg(Color::Green),
        TileState::Present => base.fg(Color::Black).bg(Color::Yellow),
        TileState::Absent => base.fg(Color::White).bg(Color::DarkGray),
        TileState::Initial => base.fg(Color::White),
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.practice {
        "🟩 WORDLE - Practice".to_string()
    } else {
        format!("🟩 WORDLE #{} ({})", puzzle_number(app.date), app.date)
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn row_line(row: &Row) -> Line<'static> {
    let mut spans = Vec::with_capacity(row.len() * 2);
    for tile in row {
        let letter = tile
            .letter()
            .map_or('·', |l| char::from(l.to_ascii_uppercase()));
        spans.push(Span::styled(format!(" {letter} "), tile_style(tile.state())));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let board = app.session.board();
    let active = app.session.active_row();
    let shaking = app.session.is_shaking();

    let mut lines = vec![Line::from("")];
    for (index, row) in board.rows().iter().enumerate() {
        let mut line = row_line(row);
        if shaking && active == Some(index) {
            line = line.style(Style::default().fg(Color::Red));
        }
        lines.push(line);
        lines.push(Line::from(""));
    }

    let border = if shaking { Color::Red } else { Color::White };
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Board ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_info_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35), // Messages
            Constraint::Percentage(40), // Result or distribution
            Constraint::Length(3),      // Win rate gauge
        ])
        .split(area);

    render_messages(f, app, chunks[0]);
    if app.input_mode == InputMode::GameOver {
        render_share(f, app, chunks[1]);
    } else {
        render_distribution(f, app, chunks[1]);
    }
    render_win_rate(f, app, chunks[2]);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.kind {
                NoticeKind::Info => Style::default().fg(Color::White),
                NoticeKind::Success => Style::default().fg(Color::Green),
                NoticeKind::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

fn render_share(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = app
        .share()
        .unwrap_or_default()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    if let Some(result) = app.session.result() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Code: "),
            Span::styled(
                result.as_str().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Result ")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(paragraph, area);
}

fn render_distribution(f: &mut Frame, app: &App, area: Rect) {
    let dist = &app.stats.guess_distribution;
    let max = dist.iter().copied().max().unwrap_or(0).max(1);
    let width = usize::from(area.width.saturating_sub(10)).max(1);

    let lines: Vec<Line> = (1..=MAX_ROWS)
        .map(|rows| {
            let count = dist[rows];
            let filled = count * width / max;
            Line::from(vec![
                Span::raw(format!("{rows} ")),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
                Span::raw(format!(" {count}")),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Guess Distribution ")
            .borders(Borders::ALL),
    );
    f.render_widget(paragraph, area);
}

fn render_win_rate(f: &mut Frame, app: &App, area: Rect) {
    // Cast is safe: win rate is within [0, 100]
    let percent = app.stats.win_rate().round().clamp(0.0, 100.0) as u16;

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Win Rate ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(percent)
        .label(format!(
            "{}/{} games won",
            app.stats.games_won, app.stats.total_games
        ));

    f.render_widget(gauge, area);
}

fn render_keyboard(f: &mut Frame, app: &App, area: Rect) {
    let keyboard = app.session.keyboard();
    let lines: Vec<Line> = KEYBOARD_ROWS
        .iter()
        .map(|keys| {
            let spans: Vec<Span> = keys
                .bytes()
                .flat_map(|k| {
                    [
                        Span::styled(
                            format!(" {} ", char::from(k.to_ascii_uppercase())),
                            tile_style(keyboard.get(k)),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Keyboard "));
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let row_text = match app.session.active_row() {
        Some(row) => format!("Row: {}/{MAX_ROWS}", row + 1),
        None => "Game over".to_string(),
    };
    f.render_widget(Paragraph::new(row_text).alignment(Alignment::Center), chunks[0]);

    let stats_text = format!(
        "Games: {} | Win Rate: {:.0}%",
        app.stats.total_games,
        app.stats.win_rate()
    );
    f.render_widget(Paragraph::new(stats_text).alignment(Alignment::Center), chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Playing => "Type: Letters | Enter: Submit | Esc: Quit",
        InputMode::GameOver => "q: Quit | n: Practice Game",
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tile;
    use crate::game::EPOCH;
    use crate::wordlists::Dictionary;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn tile_colours() {
        assert_eq!(tile_style(TileState::Correct).bg, Some(Color::Green));
        assert_eq!(tile_style(TileState::Present).bg, Some(Color::Yellow));
        assert_eq!(tile_style(TileState::Absent).bg, Some(Color::DarkGray));
        assert_eq!(tile_style(TileState::Initial).bg, None);
    }

    #[test]
    fn row_line_shows_letters() {
        let row = [
            Tile::typed(b'c'),
            Tile::evaluated(b'r', TileState::Correct),
            Tile::EMPTY,
            Tile::EMPTY,
            Tile::EMPTY,
        ];
        let text: String = row_line(&row)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, " C   R   ·   ·   ·  ");
    }

    #[test]
    fn renders_into_test_backend() {
        let dict = Dictionary::embedded();
        let app = App::new(&dict, EPOCH);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();
    }
}
