use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::{io, time::Duration};

use crate::app::{AppState, InputMode};
use crate::ui::handlers::handle_key_event;
use crate::ui::progress::TerminalYielder;

pub type PreviewTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run_app(mut app_state: AppState) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app_state);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut PreviewTerminal, app_state: &mut AppState) -> Result<()> {
    loop {
        if app_state.generation_requested {
            let outcome = {
                let mut yielder = TerminalYielder::new(terminal);
                app_state.generate_batch(&mut yielder)
            };
            app_state.finish_generation(outcome);
        }

        if app_state.should_quit {
            return Ok(());
        }

        terminal.draw(|f| ui(f, app_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app_state, key);
                }
            }
        }
    }
}

fn setup_terminal() -> Result<PreviewTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut PreviewTerminal) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(f: &mut Frame, app_state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(3),    // Document
            Constraint::Length(7), // Notifications
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    draw_title(f, app_state, chunks[0]);
    draw_document(f, app_state, chunks[1]);
    draw_notifications(f, app_state, chunks[2]);
    draw_status_bar(f, app_state, chunks[3]);

    if let InputMode::Help = app_state.input_mode {
        draw_help_popup(f, app_state, f.size());
    }
}

fn draw_title(f: &mut Frame, app_state: &AppState, area: Rect) {
    let file_name = app_state
        .data_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Untitled");

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let title = Paragraph::new(format!(" {} ", file_name))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let position = Paragraph::new(format!("{} ", app_state.navigator.position_label()))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Right);

    f.render_widget(title, layout[0]);
    f.render_widget(position, layout[1]);
}

fn draw_document(f: &mut Frame, app_state: &mut AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Preview ");
    app_state.visible_lines = block.inner(area).height as usize;

    let paragraph = match app_state.document_lines() {
        Ok(lines) if app_state.navigator.is_empty() || lines.is_empty() => {
            Paragraph::new("No records to preview").style(Style::default().fg(Color::DarkGray))
        }
        Ok(lines) => {
            let max_scroll = lines.len().saturating_sub(app_state.visible_lines);
            app_state.scroll = app_state.scroll.min(max_scroll);

            let lines: Vec<Line> = lines.into_iter().map(Line::from).collect();
            Paragraph::new(lines)
        }
        Err(message) => Paragraph::new(format!("Unable to render this record: {}", message))
            .style(Style::default().fg(Color::Red)),
    };

    let paragraph = paragraph
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app_state.scroll as u16, 0));

    f.render_widget(paragraph, area);
}

fn draw_notifications(f: &mut Frame, app_state: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Notifications ");
    let height = block.inner(area).height as usize;

    let start = app_state.notification_messages.len().saturating_sub(height);
    let text = app_state.notification_messages[start..].join("\n");

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, app_state: &AppState, area: Rect) {
    match app_state.input_mode {
        InputMode::Normal => {
            let status = "?=help | l/h=next/prev g/G=first/last j/k=scroll :N=go to record w=generate q=quit ";

            let status_widget = Paragraph::new(status)
                .style(Style::default())
                .alignment(Alignment::Left);

            f.render_widget(status_widget, area);
        }

        InputMode::Command => {
            let text = Line::from(vec![
                Span::styled(":", Style::default()),
                Span::styled(
                    app_state.input_buffer.as_str(),
                    Style::default().fg(Color::LightCyan),
                ),
            ]);

            f.render_widget(Paragraph::new(text), area);
        }

        InputMode::Help => {}
    }
}

fn draw_help_popup(f: &mut Frame, app_state: &mut AppState, area: Rect) {
    f.render_widget(Clear, area);

    let line_count = app_state.help_text.lines().count() as u16;
    let content_height = line_count + 2;

    let max_line_width = app_state
        .help_text
        .lines()
        .map(|line| line.len() as u16)
        .max()
        .unwrap_or(40);
    let content_width = max_line_width + 4;

    let popup_width = content_width.min(area.width.saturating_sub(4));
    let popup_height = content_height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    let visible_lines = popup_height.saturating_sub(2) as usize;
    app_state.help_visible_lines = visible_lines;

    let max_scroll = (line_count as usize).saturating_sub(visible_lines);
    app_state.help_scroll = app_state.help_scroll.min(max_scroll);

    let mut title = " [ESC/Enter to close] ".to_string();
    if max_scroll > 0 {
        title.push_str(" [j/k to scroll] ");
    }

    let help_block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightCyan))
        .style(Style::default().bg(Color::Blue).fg(Color::White));

    let help_paragraph = Paragraph::new(app_state.help_text.clone())
        .block(help_block)
        .wrap(Wrap { trim: false })
        .scroll((app_state.help_scroll as u16, 0));

    f.render_widget(help_paragraph, popup_area);
}
