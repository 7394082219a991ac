pub mod geodesy;

pub use geodesy::{distance, Cartesian3, DistanceUnit};
