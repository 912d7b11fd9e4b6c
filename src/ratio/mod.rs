//! Copy-number log-ratio computation.

pub mod log_ratio;

pub use log_ratio::{
    compute_ratios, RatioEngine, RatioMode, RatioRecord, RatioSet, SkippedPair, DEFAULT_LOG_BASE,
    DEFAULT_SEPARATOR,
};
