use crate::acmi::Acmi;
use crate::prelude::{AcmiResult, RecordKind, SentenceHandler};

const FILE_TYPE: &str = "FileType=";
const FILE_VERSION: &str = "FileVersion=";

/// `FileType=` / `FileVersion=` header lines.
pub struct FileHeadersHandler;

impl SentenceHandler for FileHeadersHandler {
    fn kind(&self) -> RecordKind {
        RecordKind::FileHeader
    }

    fn matches(&self, sentence: &str) -> bool {
        sentence.starts_with(FILE_TYPE) || sentence.starts_with(FILE_VERSION)
    }

    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()> {
        if let Some(file_type) = sentence.strip_prefix(FILE_TYPE) {
            acmi.file_type = Some(file_type.to_string());
        } else if let Some(version) = sentence.strip_prefix(FILE_VERSION) {
            acmi.file_version = Some(version.to_string());
        }
        Ok(())
    }
}
