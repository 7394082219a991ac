use log::info;
use std::fmt;

/// Logging front for parse and write progress.
///
/// Progress records always go out; the per-object narrative only when verbose.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    verbose: bool,
}

impl LogManager {
    pub fn new() -> Self {
        Self { verbose: true }
    }

    pub fn with_verbosity(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn narrate(&self, message: fmt::Arguments<'_>) {
        if self.verbose {
            info!("{}", message);
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
