use crate::reader::{ARCHIVE_SUFFIX, TEXT_SUFFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Appended to every derived output stem.
pub const OUTPUT_SUFFIX: &str = "_fog_of_war";

static DISALLOWED_PATH_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9.\-/]").unwrap());
static DISALLOWED_AUTHOR_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\-]").unwrap());

/// Where the filtered copy of one recording goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    stem: PathBuf,
}

impl OutputTarget {
    /// Relocates `input` from `input_root` into `output_root`.
    ///
    /// Only the part below the input root is sanitized; a file outside the
    /// root keeps just its file name.
    pub fn derive(input: &Path, input_root: &Path, output_root: &Path) -> Self {
        let relative = match input.strip_prefix(input_root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => input.file_name().map(PathBuf::from).unwrap_or_default(),
        };
        let cleaned = sanitize(&relative.to_string_lossy());
        let stem = strip_recording_suffix(&cleaned);
        Self {
            stem: output_root.join(format!("{}{}", stem, OUTPUT_SUFFIX)),
        }
    }

    pub fn stem(&self) -> &Path {
        &self.stem
    }

    pub fn text_path(&self) -> PathBuf {
        self.with_suffix(TEXT_SUFFIX)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.with_suffix(ARCHIVE_SUFFIX)
    }

    /// Name of the single entry inside the packaged archive.
    pub fn entry_name(&self) -> String {
        self.text_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// A finished archive is the only thing that counts as prior output.
    pub fn exists(&self) -> bool {
        self.archive_path().is_file()
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = OsString::from(self.stem.as_os_str());
        path.push(suffix);
        PathBuf::from(path)
    }
}

/// Spaces become `-`; anything outside `[A-Za-z0-9.-/]` is dropped.
pub fn sanitize(name: &str) -> String {
    DISALLOWED_PATH_CHARS
        .replace_all(&name.replace(' ', "-"), "")
        .into_owned()
}

/// Author as reported in run summaries.
pub fn clean_author(author: &str) -> String {
    DISALLOWED_AUTHOR_CHARS
        .replace_all(&author.replace(' ', "-"), "")
        .into_owned()
}

fn strip_recording_suffix(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for suffix in [ARCHIVE_SUFFIX, TEXT_SUFFIX] {
        if lower.ends_with(suffix) {
            return &name[..name.len() - suffix.len()];
        }
    }
    name
}
