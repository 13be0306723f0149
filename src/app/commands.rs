use crate::app::{AppState, InputMode};

impl AppState<'_> {
    pub fn execute_command(&mut self) {
        let command = self.input_buffer.trim().to_string();
        self.input_mode = InputMode::Normal;
        self.input_buffer = String::new();

        if command.is_empty() {
            return;
        }

        // :N jumps to record N
        if let Ok(number) = command.parse::<usize>() {
            self.jump_to_record(number);
            return;
        }

        match command.as_str() {
            "q" | "quit" => self.should_quit = true,
            "w" | "write" => self.request_generation(),
            "wq" | "x" => {
                self.request_generation();
                self.should_quit = true;
            }
            "first" => self.jump_to_first_record(),
            "last" => self.jump_to_last_record(),
            "help" => self.show_help(),
            _ => self.add_notification(format!("Unknown command: {}", command)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::codec::DocxCodec;
    use crate::tabular::Record;
    use crate::template::TemplateMapper;

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| std::iter::once(("Client".to_string(), format!("c{i}"))).collect())
            .collect()
    }

    fn run(app: &mut AppState, command: &str) {
        app.start_command_mode();
        for c in command.chars() {
            app.add_char_to_input(c);
        }
        app.execute_command();
    }

    #[test]
    fn numbers_jump_to_records() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();
        let mut app = AppState::new(&mapper, &codec, rows(3), PathBuf::from("data.csv"));

        run(&mut app, "3");
        assert_eq!(app.navigator.cursor(), Some(2));

        run(&mut app, "9");
        assert_eq!(app.navigator.cursor(), Some(2));
        assert_eq!(
            app.notification_messages.last().map(String::as_str),
            Some("Record 9 is out of range (1-3)")
        );

        run(&mut app, "0");
        assert_eq!(app.navigator.cursor(), Some(2));
    }

    #[test]
    fn write_requests_generation_only_with_records() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();

        let mut empty = AppState::new(&mapper, &codec, Vec::new(), PathBuf::from("data.csv"));
        run(&mut empty, "w");
        assert!(!empty.generation_requested);

        let mut app = AppState::new(&mapper, &codec, rows(1), PathBuf::from("data.csv"));
        run(&mut app, "wq");
        assert!(app.generation_requested);
        assert!(app.should_quit);
    }

    #[test]
    fn failed_write_and_quit_stays_open_with_the_error() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();
        let mut app = AppState::new(&mapper, &codec, rows(2), PathBuf::from("data.csv"));

        run(&mut app, "wq");
        let outcome = app.generate_batch(&mut |_: usize, _: usize| {});
        assert!(outcome.is_err());
        app.finish_generation(outcome);

        assert!(!app.generation_requested);
        assert!(!app.should_quit);
        assert!(
            app.notification_messages
                .last()
                .is_some_and(|message| message.starts_with("Generation failed:"))
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        let mapper = TemplateMapper::default();
        let codec = DocxCodec::default();
        let mut app = AppState::new(&mapper, &codec, rows(1), PathBuf::from("data.csv"));

        run(&mut app, "frobnicate");
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(
            app.notification_messages.last().map(String::as_str),
            Some("Unknown command: frobnicate")
        );
    }
}
