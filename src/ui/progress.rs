use std::time::Duration;

use crossterm::event;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};
use tracing::debug;

use crate::batch::Yielder;
use crate::ui::render::PreviewTerminal;

/// Redraws a progress gauge whenever the batch pauses.
pub struct TerminalYielder<'t> {
    terminal: &'t mut PreviewTerminal,
}

impl<'t> TerminalYielder<'t> {
    pub fn new(terminal: &'t mut PreviewTerminal) -> Self {
        let mut yielder = Self { terminal };
        yielder.draw(0, 0);
        yielder
    }

    fn draw(&mut self, completed: usize, total: usize) {
        let ratio = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64).clamp(0.0, 1.0)
        };
        let label = format!("{}/{} documents", completed, total);

        let result = self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(45),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ])
                .split(f.size());

            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(" Generating "))
                .gauge_style(Style::default().fg(Color::LightCyan).bg(Color::Black))
                .ratio(ratio)
                .label(label);

            f.render_widget(gauge, chunks[1]);
        });

        if let Err(e) = result {
            debug!(error = %e, "progress redraw failed");
        }
    }
}

impl Yielder for TerminalYielder<'_> {
    fn pause(&mut self, completed: usize, total: usize) {
        self.draw(completed, total);

        // Keys pressed while generating are dropped; there is no cancellation.
        while event::poll(Duration::ZERO).unwrap_or(false) {
            if event::read().is_err() {
                break;
            }
        }
    }
}
