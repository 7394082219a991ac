use crate::prelude::AcmiResult;
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;
use tempfile::Builder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compresses `text` into a single-entry archive at `archive_path`.
///
/// The archive is staged next to its destination and renamed into place once
/// complete.
pub fn package(text: &mut File, entry_name: &str, archive_path: &Path) -> AcmiResult<()> {
    let directory = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = Builder::new()
        .prefix(".fog-of-war-")
        .suffix(".part")
        .tempfile_in(directory)?;

    let mut zip = ZipWriter::new(staged);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name.to_string(), options)?;
    text.seek(SeekFrom::Start(0))?;
    io::copy(text, &mut zip)?;

    let staged = zip.finish()?;
    staged.persist(archive_path).map_err(|err| err.error)?;
    Ok(())
}
