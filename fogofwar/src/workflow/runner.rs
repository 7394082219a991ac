use crate::workflow::config::RunConfig;
use crate::workflow::discovery::discover;
use acmicore::output::{clean_author, AcmiWriter, OutputTarget, WriteOutcome};
use acmicore::processing::Parser;
use acmicore::{AcmiError, FogConfig};
use anyhow::Context;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    DryRun,
    ReadOnly { active: usize, inactive: usize },
    Written { active: usize, inactive: usize, sentences: usize },
    AlreadyExists,
    Invalid(Vec<&'static str>),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
    pub failures: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FileOutcome::Written { .. }))
            .count()
    }
}

pub struct Runner {
    config: RunConfig,
    fog: FogConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> anyhow::Result<Self> {
        let fog = config.fog_config()?;
        Ok(Self { config, fog })
    }

    /// Processes every recording in the input directory; a failing file is
    /// reported and the run moves on.
    pub fn execute(&self) -> anyhow::Result<RunSummary> {
        if self.config.dry_run {
            info!("DRY RUN ENABLED: nothing will be changed");
        } else if self.config.read_only {
            info!("READ ONLY MODE ENABLED: nothing will be written");
        }
        if !self.fog.verbose {
            info!("VERBOSE MODE DISABLED: per-object messages are skipped");
        }

        let recordings = discover(&self.config.input_dir)?;
        let mut summary = RunSummary::default();
        for input in recordings {
            match self.process_file(&input) {
                Ok(outcome) => summary.outcomes.push((input, outcome)),
                Err(err) => {
                    error!("{}: {:#}", input.display(), err);
                    summary.failures.push((input, format!("{:#}", err)));
                }
            }
        }
        Ok(summary)
    }

    pub fn process_file(&self, input: &Path) -> anyhow::Result<FileOutcome> {
        let target = OutputTarget::derive(input, &self.config.input_dir, &self.config.output_dir);
        info!("Input file: {}", input.display());
        info!("Output file: {}", target.archive_path().display());
        if self.config.dry_run {
            return Ok(FileOutcome::DryRun);
        }

        let read_started = Instant::now();
        let parser = Parser::new(&self.fog);
        let header = parser
            .parse_global_properties(input)
            .with_context(|| format!("reading headers of {}", input.display()))?;
        let author = clean_author(header.properties.author.as_deref().unwrap_or_default());
        info!("File Author: {}", author);

        if !self.config.read_only && target.exists() {
            info!("Output file exists. Skipping");
            return Ok(FileOutcome::AlreadyExists);
        }

        let acmi = parser
            .parse_file(input)
            .with_context(|| format!("parsing {}", input.display()))?;
        let active = acmi.active_count();
        let inactive = acmi.inactive_count();
        info!("ACTIVE OBJECTS: {}", active);
        info!("INACTIVE OBJECTS: {}", inactive);
        info!(
            "File read time: {:.3} sec",
            read_started.elapsed().as_secs_f64()
        );
        if self.config.read_only {
            return Ok(FileOutcome::ReadOnly { active, inactive });
        }

        let write_started = Instant::now();
        let outcome = match AcmiWriter::new(&acmi, &self.fog).write(input, &target) {
            Ok(WriteOutcome::Written(written)) => FileOutcome::Written {
                active,
                inactive,
                sentences: written.written,
            },
            Ok(WriteOutcome::AlreadyExists) => FileOutcome::AlreadyExists,
            Err(AcmiError::Validation(missing)) => {
                warn!("{} lacks {}. Skipping", input.display(), missing.join(", "));
                FileOutcome::Invalid(missing)
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("writing {}", target.archive_path().display()));
            }
        };
        info!(
            "File write time: {:.3} sec",
            write_started.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }
}
