//! Statistics over recorded games.
//!
//! Game length, winner, and how often particular three-dice rolls turned
//! up compared with their theoretical probability.

pub mod analysis;

pub use analysis::{
    default_patterns, pattern_expectation, FinalStats, Pattern, PatternReport, Statistics,
};
