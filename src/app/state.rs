use std::path::PathBuf;

use chrono::Local;
use tracing::{info, warn};

use crate::batch::{BatchGenerator, YieldPolicy, Yielder, archive_filename, deliver};
use crate::codec::DocumentCodec;
use crate::preview::{MarkupRenderer, PreviewNavigator};
use crate::tabular::Record;
use crate::template::TemplateMapper;

pub enum InputMode {
    Normal,
    Command,
    Help,
}

/// Where a finished batch went and how many documents it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub path: PathBuf,
    pub documents: usize,
}

pub struct AppState<'a> {
    pub navigator: PreviewNavigator<MarkupRenderer<'a>>,
    pub codec: &'a dyn DocumentCodec,
    pub policy: YieldPolicy,
    pub data_path: PathBuf,
    pub out_dir: PathBuf,
    pub archive_stem: String,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub scroll: usize,
    pub visible_lines: usize,
    pub notification_messages: Vec<String>,
    pub max_notifications: usize,
    pub help_text: String,
    pub help_scroll: usize,
    pub help_visible_lines: usize,
    pub generation_requested: bool,
    pub should_quit: bool,
}

impl<'a> AppState<'a> {
    pub fn new(
        mapper: &'a TemplateMapper,
        codec: &'a dyn DocumentCodec,
        rows: Vec<Record>,
        data_path: PathBuf,
    ) -> Self {
        let mut navigator = PreviewNavigator::new(MarkupRenderer::new(mapper));
        navigator.set_rows(rows);

        Self {
            navigator,
            codec,
            policy: YieldPolicy::default(),
            data_path,
            out_dir: PathBuf::from("."),
            archive_stem: "Specifications".to_string(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            scroll: 0,
            visible_lines: 20,
            notification_messages: Vec::new(),
            max_notifications: 5,
            help_text: String::new(),
            help_scroll: 0,
            help_visible_lines: 20,
            generation_requested: false,
            should_quit: false,
        }
    }

    pub fn with_output(mut self, out_dir: PathBuf, archive_stem: impl Into<String>) -> Self {
        self.out_dir = out_dir;
        self.archive_stem = archive_stem.into();
        self
    }

    pub fn with_policy(mut self, policy: YieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn add_notification(&mut self, message: String) {
        self.notification_messages.push(message);

        if self.notification_messages.len() > self.max_notifications {
            self.notification_messages.remove(0);
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer = String::new();
    }

    pub fn add_char_to_input(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn delete_char_from_input(&mut self) {
        self.input_buffer.pop();
    }

    pub fn start_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer = String::new();
    }

    pub fn request_generation(&mut self) {
        if self.navigator.is_empty() {
            self.add_notification("Nothing to generate: no records loaded".to_string());
            return;
        }
        self.generation_requested = true;
    }

    /// Generate and write the whole batch. Nothing is written unless every record succeeds.
    pub fn generate_batch(&self, yielder: &mut dyn Yielder) -> crate::Result<Delivered> {
        let mapper = self.navigator.renderer().mapper();
        let documents = BatchGenerator::new(mapper, self.codec)
            .with_policy(self.policy)
            .generate_all_with(self.navigator.rows(), &mut |_, _| {}, yielder)?;

        let archive_name = archive_filename(&self.archive_stem, Local::now().date_naive());
        let delivery = deliver(documents, &archive_name)?;
        let path = delivery.write_to(&self.out_dir)?;

        Ok(Delivered {
            path,
            documents: delivery.document_count(),
        })
    }

    pub fn finish_generation(&mut self, outcome: crate::Result<Delivered>) {
        self.generation_requested = false;

        match outcome {
            Ok(delivered) => {
                info!(path = %delivered.path.display(), "batch written from previewer");
                self.add_notification(format!(
                    "Wrote {} document(s) to {}",
                    delivered.documents,
                    delivered.path.display()
                ));
            }
            Err(e) => {
                warn!(error = %e, "batch generation from previewer failed");
                // A pending `:wq` must not close the screen over the failure.
                self.should_quit = false;
                self.add_notification(format!("Generation failed: {}", e));
            }
        }
    }

    /// Lines of the current preview, or the error that prevented rendering it.
    pub fn document_lines(&self) -> Result<Vec<String>, String> {
        match self.navigator.renderer().output() {
            Ok(markup) => Ok(crate::preview::markup_to_text(markup)),
            Err(message) => Err(message.to_string()),
        }
    }
}
