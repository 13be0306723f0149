use tracing::{debug, info, warn};

use crate::batch::schedule::{ThreadYielder, YieldPolicy, Yielder, drive};
use crate::codec::DocumentCodec;
use crate::error::{Error, Result};
use crate::tabular::Record;
use crate::template::TemplateMapper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Fills the document template once per record through a codec.
pub struct BatchGenerator<'a, C: DocumentCodec + ?Sized> {
    mapper: &'a TemplateMapper,
    codec: &'a C,
    policy: YieldPolicy,
}

impl<'a, C: DocumentCodec + ?Sized> BatchGenerator<'a, C> {
    pub fn new(mapper: &'a TemplateMapper, codec: &'a C) -> Self {
        Self {
            mapper,
            codec,
            policy: YieldPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: YieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn generate_one(&self, record: &Record, index: usize) -> Result<GeneratedDocument> {
        let bindings = self.mapper.fill_for_generation(record)?;
        let template = self.mapper.document_template()?;
        let content = self.codec.render(template, &bindings)?;

        let identity = &self.mapper.naming().identity_field;
        if record.get(identity).trim().is_empty() {
            warn!(
                record = index + 1,
                field = %identity,
                "identity field is empty, using fallback file name"
            );
        }

        Ok(GeneratedDocument {
            filename: self.mapper.generate_filename(record, index),
            content,
        })
    }

    /// One result per record, in record order. Errors carry the record index.
    pub fn documents<'r>(
        &'r self,
        records: &'r [Record],
    ) -> impl Iterator<Item = Result<GeneratedDocument>> + 'r {
        records.iter().enumerate().map(move |(index, record)| {
            self.generate_one(record, index)
                .map_err(|source| Error::Generation {
                    index,
                    source: Box::new(source),
                })
        })
    }

    pub fn generate_all(&self, records: &[Record]) -> Result<Vec<GeneratedDocument>> {
        self.generate_all_with(records, &mut |_, _| {}, &mut ThreadYielder)
    }

    /// Generate every record or none: the first failure aborts the whole batch.
    pub fn generate_all_with(
        &self,
        records: &[Record],
        on_progress: &mut dyn FnMut(usize, usize),
        yielder: &mut dyn Yielder,
    ) -> Result<Vec<GeneratedDocument>> {
        let total = records.len();
        info!(total, every = self.policy.interval(), "generating documents");

        let documents = drive(
            self.documents(records),
            total,
            self.policy,
            &mut |completed, total| {
                debug!(completed, total, "document generated");
                on_progress(completed, total);
            },
            yielder,
        )?;

        info!(count = documents.len(), "batch generated");
        Ok(documents)
    }
}
