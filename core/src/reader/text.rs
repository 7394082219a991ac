use crate::prelude::{AcmiError, AcmiResult};
use crate::reader::stream::{SentenceSource, SentenceStream};
use crate::reader::{has_suffix, AcmiReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const TEXT_SUFFIX: &str = ".txt.acmi";

/// Reads a plain-text recording straight from disk.
#[derive(Default)]
pub struct AcmiTextReader {
    stream: Option<SentenceStream>,
}

impl AcmiTextReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AcmiReader for AcmiTextReader {
    fn supports(&self, path: &Path) -> bool {
        has_suffix(path, TEXT_SUFFIX)
    }

    fn start(&mut self, path: &Path) -> AcmiResult<()> {
        let file = File::open(path).map_err(|source| AcmiError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        self.stream = Some(SentenceStream::new(BufReader::with_capacity(8192, file)));
        Ok(())
    }
}

impl SentenceSource for AcmiTextReader {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn text_reader_supports_only_plain_suffix() {
        let reader = AcmiTextReader::new();
        assert!(reader.supports(Path::new("/Tacview/mission.txt.acmi")));
        assert!(!reader.supports(Path::new("/Tacview/mission.zip.acmi")));
        assert!(!reader.supports(Path::new("/Tacview/mission.txt")));
    }

    #[test]
    fn text_reader_streams_file_contents() {
        let mut temp = Builder::new().suffix(TEXT_SUFFIX).tempfile().unwrap();
        temp.write_all(b"FileType=text/acmi/tacview\nFileVersion=2.2\n")
            .unwrap();

        let mut reader = AcmiTextReader::new();
        reader.start(temp.path()).unwrap();
        assert_eq!(
            reader.next_sentence().unwrap().as_deref(),
            Some("FileType=text/acmi/tacview")
        );
        assert_eq!(
            reader.next_sentence().unwrap().as_deref(),
            Some("FileVersion=2.2")
        );
        assert!(reader.next_sentence().unwrap().is_none());
        assert!(reader.eof());
    }

    #[test]
    fn missing_file_is_an_access_error() {
        let mut reader = AcmiTextReader::new();
        let result = reader.start(Path::new("/nonexistent/recording.txt.acmi"));
        assert!(matches!(result, Err(AcmiError::Access { .. })));
    }
}
