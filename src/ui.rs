use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use whackr::game::Phase;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Cell geometry for the 3x3 board: bordered box with one content line.
const CELL_WIDTH: u16 = 11;
const CELL_HEIGHT: u16 = 3;
const BOARD_WIDTH: u16 = CELL_WIDTH * 3;
const BOARD_HEIGHT: u16 = CELL_HEIGHT * 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Menu => render_menu(self, area, buf),
            AppState::Playing => render_play(self, area, buf),
            AppState::GameOver => render_game_over(self, area, buf),
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let magenta_style = Style::default().fg(Color::Magenta);

    let title = "W H A C K R";
    let underline = "─".repeat(title.width());
    let config = &app.game.session_config;

    let sound = if config.silent { "off" } else { "on" };

    let lines = vec![
        Line::from(Span::styled(title, bold_style.fg(Color::Yellow))),
        Line::from(Span::styled(underline, dim_style)),
        Line::from(""),
        Line::from(vec![
            Span::raw("difficulty  "),
            Span::styled(format!("◂ {} ▸", config.difficulty), magenta_style),
        ]),
        Line::from(vec![
            Span::raw("duration    "),
            Span::styled(format!("{}s", config.duration_secs), magenta_style),
            Span::styled("  (↑/↓)", dim_style),
        ]),
        Line::from(vec![
            Span::raw("sound       "),
            Span::styled(sound.to_string(), magenta_style),
            Span::styled("  (s)", dim_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) start  (esc) quit",
            dim_style.add_modifier(Modifier::ITALIC),
        )),
    ];

    let height = lines.len() as u16;
    let menu = Paragraph::new(lines).alignment(Alignment::Center);
    menu.render(centered_rect(area.width, height, area), buf);
}

fn render_play(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    render_status_line(app, chunks[0], buf);
    render_board(app, chunks[1], buf);

    let footer = Paragraph::new(Span::styled(
        "whack with 1-9 · esc stops the round",
        Style::default()
            .add_modifier(Modifier::DIM)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    footer.render(chunks[2], buf);
}

fn render_status_line(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let state = &app.game.session_state;

    let status = Line::from(vec![
        Span::raw("score "),
        Span::styled(state.score.to_string(), bold_style.fg(Color::Green)),
        Span::raw("   time "),
        Span::styled(
            format!("{}s", state.seconds_remaining),
            bold_style.fg(Color::Cyan),
        ),
        Span::raw("   difficulty "),
        Span::styled(app.game.session_config.difficulty.to_string(), bold_style),
    ]);

    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width < BOARD_WIDTH || area.height < BOARD_HEIGHT {
        Paragraph::new("terminal too small")
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let board_area = centered_rect(BOARD_WIDTH, BOARD_HEIGHT, area);
    let live_hole = match app.game.phase {
        Phase::Showing { hole, .. } => Some(hole),
        _ => None,
    };

    for row in 0..3u16 {
        for col in 0..3u16 {
            let index = (row * 3 + col) as usize;
            let cell = Rect {
                x: board_area.x + col * CELL_WIDTH,
                y: board_area.y + row * CELL_HEIGHT,
                width: CELL_WIDTH,
                height: CELL_HEIGHT,
            };
            render_hole(app, index, live_hole, cell, buf);
        }
    }
}

fn render_hole(app: &App, index: usize, live_hole: Option<usize>, cell: Rect, buf: &mut Buffer) {
    let hole = &app.game.board.holes[index];

    let border_style = if live_hole == Some(index) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let content = match (hole.visible, hole.character()) {
        (true, Some(character)) => {
            let sprite_style = if hole.hit {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            };
            let sprite = if hole.hit {
                character.hit_sprite
            } else {
                character.idle_sprite
            };
            Line::from(vec![
                Span::styled(sprite, sprite_style),
                Span::styled(
                    format!(" {}", character.points),
                    Style::default().fg(Color::Magenta),
                ),
            ])
        }
        _ => Line::from(Span::styled(
            "·",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };

    Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!("{}", index + 1)),
        )
        .render(cell, buf);
}

fn render_game_over(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let state = &app.game.session_state;

    let mut lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            bold_style.fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("final score "),
            Span::styled(state.score.to_string(), bold_style.fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::raw("hits "),
            Span::styled(state.hits.to_string(), bold_style),
            Span::raw(" of "),
            Span::styled(state.appearances.to_string(), bold_style),
            Span::raw(" targets"),
        ]),
    ];

    match app.game_over_best {
        Some(best) if state.score >= best && state.score > 0 => {
            lines.push(Line::from(Span::styled(
                "★ new best score",
                bold_style.fg(Color::Yellow),
            )));
        }
        Some(best) => {
            lines.push(Line::from(vec![
                Span::raw("best so far "),
                Span::styled(best.to_string(), bold_style.fg(Color::Cyan)),
            ]));
        }
        None => {}
    }

    if !app.game_over_summary.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("all-time favourites", dim_style)));
        for entry in app.game_over_summary.iter().take(3) {
            lines.push(Line::from(Span::raw(format!(
                "{} ×{} · {} pts",
                entry.character, entry.hits, entry.points
            ))));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(r)estart  (m)enu  (esc)ape",
        dim_style.add_modifier(Modifier::ITALIC),
    )));

    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_rect(area.width, height, area), buf);
}
