use crate::acmi::Acmi;
use crate::output::archive::package;
use crate::output::naming::OutputTarget;
use crate::prelude::{AcmiResult, FogConfig, RecordKind};
use crate::processing::{object_update_id, Dispatcher, PROGRESS_INTERVAL};
use crate::reader::{encode_sentence, open_recording, SentenceSource};
use crate::telemetry::log::LogManager;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::Builder;

/// Sentence counts of one filtering replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub read: usize,
    pub written: usize,
}

impl WriteSummary {
    pub fn dropped(&self) -> usize {
        self.read - self.written
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(WriteSummary),
    AlreadyExists,
}

/// Second pass: replays a recording and keeps only what the first pass
/// resolved as visible.
pub struct AcmiWriter<'a> {
    acmi: &'a Acmi,
    dispatcher: Dispatcher,
    logger: LogManager,
}

impl<'a> AcmiWriter<'a> {
    pub fn new(acmi: &'a Acmi, config: &FogConfig) -> Self {
        Self {
            acmi,
            dispatcher: Dispatcher::with_default_handlers(config),
            logger: LogManager::with_verbosity(config.verbose),
        }
    }

    /// Structural sentences always pass; object updates pass when their
    /// object is active. Deletions and unrecognized sentences are dropped.
    pub fn retains(&self, sentence: &str) -> bool {
        match self.dispatcher.classify(sentence) {
            Some(RecordKind::ObjectUpdate) => {
                object_update_id(sentence).is_some_and(|id| self.acmi.is_active(id))
            }
            Some(kind) => kind.is_structural(),
            None => false,
        }
    }

    pub fn filter_source<S, W>(&self, source: &mut S, sink: &mut W) -> AcmiResult<WriteSummary>
    where
        S: SentenceSource + ?Sized,
        W: Write,
    {
        let mut summary = WriteSummary::default();
        while let Some(sentence) = source.next_sentence()? {
            if sentence.is_empty() {
                continue;
            }
            summary.read += 1;
            if summary.read % PROGRESS_INTERVAL == 0 {
                self.logger
                    .record(&format!("WRITING: {} records", summary.read));
            }
            if self.retains(&sentence) {
                sink.write_all(encode_sentence(&sentence).as_bytes())?;
                sink.write_all(b"\n")?;
                summary.written += 1;
            }
        }
        Ok(summary)
    }

    /// Writes the filtered copy of `input` to `target`.
    ///
    /// Returns early when a finished archive is already in place, and fails
    /// with a validation error before touching the disk when the recording
    /// lacks required properties.
    pub fn write(&self, input: &Path, target: &OutputTarget) -> AcmiResult<WriteOutcome> {
        if target.exists() {
            self.logger.record(&format!(
                "Output {} exists. Skipping",
                target.archive_path().display()
            ));
            return Ok(WriteOutcome::AlreadyExists);
        }
        self.acmi.properties.validate()?;

        let mut source = open_recording(input)?;
        let archive_path = target.archive_path();
        let directory = match archive_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        fs::create_dir_all(&directory)?;

        let mut text = Builder::new()
            .prefix(".fog-of-war-")
            .suffix(".txt.part")
            .tempfile_in(&directory)?;
        let summary = {
            let mut sink = BufWriter::new(text.as_file_mut());
            let summary = self.filter_source(source.as_mut(), &mut sink)?;
            sink.flush()?;
            summary
        };

        self.logger.record(&format!(
            "Creating zip archive: {}",
            archive_path.display()
        ));
        package(text.as_file_mut(), &target.entry_name(), &archive_path)?;
        text.close()?;

        self.logger.record(&format!(
            "Wrote {} of {} sentences to {}",
            summary.written,
            summary.read,
            archive_path.display()
        ));
        Ok(WriteOutcome::Written(summary))
    }
}
