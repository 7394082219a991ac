use crate::acmi::Acmi;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default weapon search radius in meters.
pub const DEFAULT_WEAPON_RADIUS_M: u32 = 50;

/// Immutable settings shared by the read and write passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub weapon_radius_m: u32,
    pub verbose: bool,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            weapon_radius_m: DEFAULT_WEAPON_RADIUS_M,
            verbose: true,
        }
    }
}

impl FogConfig {
    pub fn new(weapon_radius_m: u32, verbose: bool) -> AcmiResult<Self> {
        let config = Self {
            weapon_radius_m,
            verbose,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AcmiResult<()> {
        if self.weapon_radius_m == 0 {
            return Err(AcmiError::InvalidConfig(
                "weapon radius must be a positive number of meters".into(),
            ));
        }
        Ok(())
    }

    /// Kilometer threshold a weapon impact is compared against.
    ///
    /// The threshold is `1000 / radius`, so a 50 m radius admits targets
    /// closer than 20 km.
    pub fn hit_threshold_km(&self) -> f64 {
        1000.0 / f64::from(self.weapon_radius_m.max(1))
    }

    /// The same threshold expressed in meters.
    pub fn effective_hit_radius_m(&self) -> f64 {
        self.hit_threshold_km() * 1000.0
    }
}

/// Shapes a sentence can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    FileHeader,
    GlobalProperty,
    Timeframe,
    ObjectUpdate,
    ObjectDeletion,
    Event,
}

impl RecordKind {
    /// Sentences that may appear in the leading header block of a recording.
    pub fn is_header_section(self) -> bool {
        matches!(
            self,
            RecordKind::FileHeader | RecordKind::GlobalProperty | RecordKind::Event
        )
    }

    /// Sentences copied to filtered output without consulting the object table.
    pub fn is_structural(self) -> bool {
        match self {
            RecordKind::FileHeader
            | RecordKind::GlobalProperty
            | RecordKind::Timeframe
            | RecordKind::Event => true,
            RecordKind::ObjectUpdate | RecordKind::ObjectDeletion => false,
        }
    }
}

/// Common error type for reading, parsing and writing recordings.
#[derive(thiserror::Error, Debug)]
pub enum AcmiError {
    #[error("format error: {0}")]
    Format(String),
    #[error("cannot access {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive support unavailable: {0}")]
    UnsupportedArchive(String),
    #[error("no reader supports {0}")]
    UnsupportedInput(PathBuf),
    #[error("unknown global property: {0}")]
    UnknownProperty(String),
    #[error("recording is missing required properties: {}", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type AcmiResult<T> = Result<T, AcmiError>;

macro_rules! format_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::prelude::AcmiError::Format( format!( $fmt $(, $arg)* ))
    };
}
pub(crate) use format_error;

/// Trait describing one recognized sentence shape and how it updates the session.
pub trait SentenceHandler {
    fn kind(&self) -> RecordKind;
    fn matches(&self, sentence: &str) -> bool;
    fn handle(&self, sentence: &str, acmi: &mut Acmi) -> AcmiResult<()>;
}
