use crate::prelude::{AcmiError, AcmiResult};
use crate::reader::stream::{SentenceSource, SentenceStream};
use crate::reader::{has_suffix, AcmiReader};
use std::fs::File;
use std::io::{self, BufReader, Seek, SeekFrom};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

pub const ARCHIVE_SUFFIX: &str = ".zip.acmi";

/// Reads the sole entry of a zip-packaged recording.
///
/// The entry is inflated into an anonymous temporary file before reading.
#[derive(Default)]
pub struct AcmiZipReader {
    stream: Option<SentenceStream>,
}

impl AcmiZipReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AcmiReader for AcmiZipReader {
    fn supports(&self, path: &Path) -> bool {
        has_suffix(path, ARCHIVE_SUFFIX)
    }

    fn start(&mut self, path: &Path) -> AcmiResult<()> {
        let file = File::open(path).map_err(|source| AcmiError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;
        if archive.is_empty() {
            return Err(AcmiError::UnsupportedArchive(format!(
                "{} contains no entries",
                path.display()
            )));
        }

        let mut entry = archive.by_index(0).map_err(|err| match err {
            ZipError::UnsupportedArchive(reason) => {
                AcmiError::UnsupportedArchive(reason.to_string())
            }
            other => AcmiError::Archive(other),
        })?;

        let mut inflated = tempfile::tempfile()?;
        io::copy(&mut entry, &mut inflated)?;
        inflated.seek(SeekFrom::Start(0))?;

        self.stream = Some(SentenceStream::new(BufReader::with_capacity(
            8192, inflated,
        )));
        Ok(())
    }
}

impl SentenceSource for AcmiZipReader {
    fn next_sentence(&mut self) -> AcmiResult<Option<String>> {
        match self.stream.as_mut() {
            Some(stream) => stream.next_sentence(),
            None => Ok(None),
        }
    }

    fn eof(&self) -> bool {
        self.stream.as_ref().map_or(true, SentenceStream::eof)
    }
}
