pub mod archive;
pub mod naming;
pub mod writer;

pub use archive::package;
pub use naming::{clean_author, sanitize, OutputTarget, OUTPUT_SUFFIX};
pub use writer::{AcmiWriter, WriteOutcome, WriteSummary};
