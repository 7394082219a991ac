use acmicore::reader::is_recording;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recordings below `input_dir`, sorted by path.
pub fn discover(input_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut recordings = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("scanning input directory {}", input_dir.display()))?;
        if entry.file_type().is_file() && is_recording(entry.path()) {
            recordings.push(entry.into_path());
        }
    }
    Ok(recordings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_text_and_zip_recordings_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("week1")).unwrap();
        for name in ["b.zip.acmi", "a.txt.acmi", "notes.txt", "week1/c.TXT.ACMI"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir_all(dir.path().join("folder.txt.acmi")).unwrap();

        let found = discover(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|path| path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt.acmi"),
                PathBuf::from("b.zip.acmi"),
                PathBuf::from("week1/c.TXT.ACMI"),
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("absent")).is_err());
    }
}
