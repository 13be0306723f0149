use crate::app::AppState;

impl AppState<'_> {
    pub fn next_record(&mut self) {
        if self.navigator.next() {
            self.scroll = 0;
        } else if !self.navigator.is_empty() {
            self.add_notification("Already at the last record".to_string());
        }
    }

    pub fn previous_record(&mut self) {
        if self.navigator.previous() {
            self.scroll = 0;
        } else if !self.navigator.is_empty() {
            self.add_notification("Already at the first record".to_string());
        }
    }

    pub fn jump_to_first_record(&mut self) {
        if self.navigator.first() {
            self.scroll = 0;
            self.add_notification("Jumped to first record".to_string());
        }
    }

    pub fn jump_to_last_record(&mut self) {
        if self.navigator.last() {
            self.scroll = 0;
            self.add_notification("Jumped to last record".to_string());
        }
    }

    /// `number` is 1-based, as shown in the title bar.
    pub fn jump_to_record(&mut self, number: usize) {
        let moved = number
            .checked_sub(1)
            .is_some_and(|index| self.navigator.go_to(index));

        if moved {
            self.scroll = 0;
            self.add_notification(format!("Jumped to record {}", number));
        } else {
            self.add_notification(format!(
                "Record {} is out of range (1-{})",
                number,
                self.navigator.len()
            ));
        }
    }

    pub fn scroll_document(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }
}
