//! Dashboard page: static platform status grid.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Platform services shown on the grid. Purely informational; there is no
/// health polling behind them.
const SERVICES: &[(&str, &str)] = &[
    ("Database", "Hosted relational store"),
    ("Vector Store", "Embedding search index"),
    ("Orchestrator", "Agent runtime"),
    ("Search Engine", "SearXNG instance"),
];

#[derive(Debug, Default)]
pub struct DashboardPage {
    /// Drives the cosmetic pulse on the status dots.
    tick: u64,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(3)])
            .split(area);

        self.render_grid(frame, chunks[0]);
        self.render_footer(frame, chunks[1]);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (row_index, row) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);

            for (col_index, cell) in cells.iter().enumerate() {
                let (name, description) = SERVICES[row_index * 2 + col_index];
                self.render_service(frame, *cell, name, description);
            }
        }
    }

    fn render_service(&self, frame: &mut Frame, area: Rect, name: &str, description: &str) {
        let dot_color = if self.tick % 2 == 0 {
            Color::Green
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {name} "));
        let lines = vec![
            Line::from(vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::styled("Online", Style::default().fg(Color::Green)),
            ]),
            Line::from(Span::styled(
                description.to_string(),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "All systems operational",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )))
        .block(block)
        .centered();
        frame.render_widget(paragraph, area);
    }
}
