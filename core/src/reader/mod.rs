pub mod archive;
pub mod stream;
pub mod text;

pub use archive::{AcmiZipReader, ARCHIVE_SUFFIX};
pub use stream::{encode_sentence, SentenceSource, SentenceStream};
pub use text::{AcmiTextReader, TEXT_SUFFIX};

use crate::prelude::{AcmiError, AcmiResult};
use std::path::Path;

/// A sentence source that can be opened on a recording file.
pub trait AcmiReader: SentenceSource {
    fn supports(&self, path: &Path) -> bool;
    fn start(&mut self, path: &Path) -> AcmiResult<()>;
}

pub fn default_readers() -> Vec<Box<dyn AcmiReader>> {
    vec![Box::new(AcmiZipReader::new()), Box::new(AcmiTextReader::new())]
}

/// Picks the reader for a recording by its suffix and opens it.
pub fn open_recording(path: &Path) -> AcmiResult<Box<dyn AcmiReader>> {
    let mut reader = default_readers()
        .into_iter()
        .find(|reader| reader.supports(path))
        .ok_or_else(|| AcmiError::UnsupportedInput(path.to_path_buf()))?;
    reader.start(path)?;
    Ok(reader)
}

/// True when the recording path is one of the two recognized kinds.
pub fn is_recording(path: &Path) -> bool {
    has_suffix(path, TEXT_SUFFIX) || has_suffix(path, ARCHIVE_SUFFIX)
}

pub(crate) fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().to_ascii_lowercase().ends_with(suffix)
}
