use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{AppState, InputMode};

pub fn handle_key_event(app_state: &mut AppState, key: KeyEvent) {
    match app_state.input_mode {
        InputMode::Normal => handle_normal_mode(app_state, key.code),
        InputMode::Command => handle_command_mode(app_state, key.code),
        InputMode::Help => handle_help_mode(app_state, key.code),
    }
}

fn handle_command_mode(app_state: &mut AppState, key_code: KeyCode) {
    match key_code {
        KeyCode::Enter => app_state.execute_command(),
        KeyCode::Esc => app_state.cancel_input(),
        KeyCode::Backspace => app_state.delete_char_from_input(),
        KeyCode::Char(c) => app_state.add_char_to_input(c),
        _ => {}
    }
}

fn handle_normal_mode(app_state: &mut AppState, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => app_state.next_record(),
        KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => app_state.previous_record(),
        KeyCode::Char('g') | KeyCode::Home => app_state.jump_to_first_record(),
        KeyCode::Char('G') | KeyCode::End => app_state.jump_to_last_record(),
        KeyCode::Char('j') | KeyCode::Down => app_state.scroll_document(1),
        KeyCode::Char('k') | KeyCode::Up => app_state.scroll_document(-1),
        KeyCode::PageDown => {
            let page = app_state.visible_lines.max(1) as isize;
            app_state.scroll_document(page);
        }
        KeyCode::PageUp => {
            let page = app_state.visible_lines.max(1) as isize;
            app_state.scroll_document(-page);
        }
        KeyCode::Char('w') => app_state.request_generation(),
        KeyCode::Char(':') => app_state.start_command_mode(),
        KeyCode::Char('?') => app_state.show_help(),
        KeyCode::Char('q') => app_state.should_quit = true,
        _ => {}
    }
}

fn handle_help_mode(app_state: &mut AppState, key_code: KeyCode) {
    let line_count = app_state.help_text.lines().count();
    let max_scroll = line_count.saturating_sub(app_state.help_visible_lines);

    match key_code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app_state.input_mode = InputMode::Normal;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app_state.help_scroll = (app_state.help_scroll + 1).min(max_scroll);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app_state.help_scroll = app_state.help_scroll.saturating_sub(1);
        }
        KeyCode::Home => app_state.help_scroll = 0,
        KeyCode::End => app_state.help_scroll = max_scroll,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::codec::DocxCodec;
    use crate::tabular::Record;
    use crate::template::TemplateMapper;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_the_navigator() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();
        let rows: Vec<Record> = (0..4)
            .map(|i| std::iter::once(("Client".to_string(), i.to_string())).collect())
            .collect();
        let mut app = AppState::new(&mapper, &codec, rows, PathBuf::from("data.csv"));

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.navigator.cursor(), Some(2));

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.navigator.cursor(), Some(3));

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.navigator.cursor(), Some(0));

        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.cursor(), Some(1));

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_opens_and_closes() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();
        let mut app = AppState::new(&mapper, &codec, Vec::new(), PathBuf::from("data.csv"));

        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.input_mode, InputMode::Help));
        assert!(app.help_text.contains("Next record"));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.input_mode, InputMode::Normal));
    }
}
