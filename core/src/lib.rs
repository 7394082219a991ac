//! Streaming ACMI flight-recording parser with fog-of-war filtering.
//!
//! A recording is read twice: the first pass rebuilds every tracked object and
//! resolves which ones interacted (launched a weapon, were hit, or belong to a
//! non-red side), the second pass replays the sentences and keeps only those
//! objects.

pub mod acmi;
pub mod math;
pub mod output;
pub mod prelude;
pub mod processing;
pub mod reader;
pub mod telemetry;

pub use acmi::Acmi;
pub use prelude::{AcmiError, AcmiResult, FogConfig, RecordKind, SentenceHandler};
