use crate::app::AppState;
use crate::app::InputMode;

impl AppState<'_> {
    pub fn show_help(&mut self) {
        self.help_scroll = 0;

        self.help_text = "NAVIGATION:\n\
             l, n, Right - Next record\n\
             h, p, Left  - Previous record\n\
             g           - First record\n\
             G           - Last record\n\
             j, Down     - Scroll document down\n\
             k, Up       - Scroll document up\n\
             :[number]   - Jump to record (e.g., :12)\n\
             :first      - Jump to first record\n\
             :last       - Jump to last record\n\n\
             GENERATION:\n\
             w, :w       - Generate every record and write the result\n\
                           (one .docx, or a .zip for several records)\n\
             :wq, :x     - Generate, write, then quit\n\n\
             OTHER:\n\
             ?, :help    - Show this help\n\
             q, :q       - Quit\n"
            .to_string();

        self.input_mode = InputMode::Help;
    }
}
