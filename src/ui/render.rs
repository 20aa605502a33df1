use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::runner::TickView;
use crate::ui::field::{AGENT, OBSTACLE};

/// Terminal columns per grid cell; keeps cells roughly square.
const CELL_WIDTH: usize = 2;

fn cell_style(glyph: char) -> Style {
    match glyph {
        AGENT => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        OBSTACLE => Style::default().fg(Color::DarkGray).bg(Color::Black),
        _ => Style::default().fg(Color::DarkGray).bg(Color::Gray),
    }
}

fn styled_row(row: &str) -> Line<'static> {
    row.chars()
        .map(|glyph| Span::styled(glyph.to_string().repeat(CELL_WIDTH), cell_style(glyph)))
        .collect::<Vec<_>>()
        .into()
}

/// Status line shown above the field.
#[must_use]
pub fn hud_line(view: &TickView<'_>) -> String {
    format!(
        "Tick: {}/{} | Pos: {} | State: {:?} | Seed: {} | q: quit",
        view.tick, view.max_steps, view.position, view.state, view.seed
    )
}

pub fn draw_ui(f: &mut Frame, grid_lines: &[String], hud_info: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info.to_owned(),
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines.iter().map(|s| styled_row(s)).collect();
    let field = Paragraph::new(text).block(Block::default().borders(Borders::NONE));
    f.render_widget(field, chunks[1]);
}
