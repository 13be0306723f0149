use crate::tabular::Record;
use crate::template::TemplateMapper;

/// What the navigator asks its renderer to show.
#[derive(Debug, Clone, Copy)]
pub enum PreviewFrame<'r> {
    Blank,
    Record {
        index: usize,
        total: usize,
        record: &'r Record,
    },
}

pub trait PreviewRenderer {
    fn render(&mut self, frame: PreviewFrame<'_>);
}

/// Cursor over a set of records. Every successful move re-renders the current record.
///
/// The cursor is `None` exactly when there are no rows.
pub struct PreviewNavigator<R> {
    rows: Vec<Record>,
    cursor: Option<usize>,
    renderer: R,
}

impl<R: PreviewRenderer> PreviewNavigator<R> {
    pub fn new(mut renderer: R) -> Self {
        renderer.render(PreviewFrame::Blank);
        Self {
            rows: Vec::new(),
            cursor: None,
            renderer,
        }
    }

    /// Replace the rows wholesale and show the first one.
    pub fn set_rows(&mut self, rows: Vec<Record>) {
        self.rows = rows;
        self.cursor = if self.rows.is_empty() { None } else { Some(0) };
        self.render_current();
    }

    pub fn next(&mut self) -> bool {
        match self.cursor {
            Some(index) if index + 1 < self.rows.len() => self.move_to(index + 1),
            _ => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.cursor {
            Some(index) if index > 0 => self.move_to(index - 1),
            _ => false,
        }
    }

    /// Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.move_to(index)
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last(&mut self) -> bool {
        match self.rows.len() {
            0 => false,
            len => self.go_to(len - 1),
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.cursor = None;
        self.renderer.render(PreviewFrame::Blank);
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn current(&self) -> Option<&Record> {
        self.cursor.and_then(|index| self.rows.get(index))
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// "Record 2 of 5", or "No records".
    pub fn position_label(&self) -> String {
        match self.cursor {
            Some(index) => format!("Record {} of {}", index + 1, self.rows.len()),
            None => "No records".to_string(),
        }
    }

    fn move_to(&mut self, index: usize) -> bool {
        self.cursor = Some(index);
        self.render_current();
        true
    }

    fn render_current(&mut self) {
        let frame = match self.cursor {
            Some(index) => PreviewFrame::Record {
                index,
                total: self.rows.len(),
                record: &self.rows[index],
            },
            None => PreviewFrame::Blank,
        };
        self.renderer.render(frame);
    }
}

/// Renders frames to filled preview markup through a [`TemplateMapper`].
pub struct MarkupRenderer<'m> {
    mapper: &'m TemplateMapper,
    output: Result<String, String>,
}

impl<'m> MarkupRenderer<'m> {
    pub fn new(mapper: &'m TemplateMapper) -> Self {
        Self {
            mapper,
            output: Ok(String::new()),
        }
    }

    pub fn mapper(&self) -> &TemplateMapper {
        self.mapper
    }

    /// The last rendered markup, or the message of the error that prevented it.
    pub fn output(&self) -> Result<&str, &str> {
        self.output.as_deref().map_err(String::as_str)
    }
}

impl PreviewRenderer for MarkupRenderer<'_> {
    fn render(&mut self, frame: PreviewFrame<'_>) {
        self.output = match frame {
            PreviewFrame::Blank => Ok(String::new()),
            PreviewFrame::Record { record, .. } => self
                .mapper
                .fill_for_preview(record)
                .map_err(|error| error.to_string()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recording {
        frames: Vec<Option<usize>>,
    }

    impl PreviewRenderer for Recording {
        fn render(&mut self, frame: PreviewFrame<'_>) {
            self.frames.push(match frame {
                PreviewFrame::Blank => None,
                PreviewFrame::Record { index, .. } => Some(index),
            });
        }
    }

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| std::iter::once(("Client".to_string(), format!("c{i}"))).collect())
            .collect()
    }

    #[test]
    fn starts_blank_and_empty() {
        let navigator = PreviewNavigator::new(Recording::default());
        assert_eq!(navigator.cursor(), None);
        assert_eq!(navigator.renderer().frames, vec![None]);
        assert_eq!(navigator.position_label(), "No records");
    }

    #[test]
    fn set_rows_with_nothing_stays_empty() {
        let mut navigator = PreviewNavigator::new(Recording::default());
        navigator.set_rows(Vec::new());

        assert_eq!(navigator.cursor(), None);
        assert!(!navigator.next());
        assert!(!navigator.previous());
        assert!(!navigator.last());
    }

    #[test]
    fn moves_render_only_when_they_succeed() {
        let mut navigator = PreviewNavigator::new(Recording::default());
        navigator.set_rows(rows(3));

        assert!(!navigator.go_to(3));
        assert!(navigator.last());
        assert!(!navigator.next());
        assert!(navigator.first());
        assert_eq!(navigator.position_label(), "Record 1 of 3");

        assert_eq!(navigator.renderer().frames, vec![None, Some(0), Some(2), Some(0)]);
    }

    #[test]
    fn clear_renders_blank() {
        let mut navigator = PreviewNavigator::new(Recording::default());
        navigator.set_rows(rows(2));
        navigator.next();
        navigator.clear();

        assert!(navigator.is_empty());
        assert!(navigator.current().is_none());
        assert_eq!(navigator.renderer().frames.last(), Some(&None));
    }

    #[test]
    fn markup_renderer_reports_unloaded_templates() {
        let mapper = TemplateMapper::default();
        let mut navigator = PreviewNavigator::new(MarkupRenderer::new(&mapper));
        assert_eq!(navigator.renderer().output(), Ok(""));

        navigator.set_rows(rows(1));
        assert!(navigator.renderer().output().is_err());
    }
}
