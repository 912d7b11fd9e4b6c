//! Tumor/Normal Pairing and Copy-Number Log-Ratios
//!
//! This library pairs tumor and matched-normal biospecimen samples of a
//! cohort and computes per-locus copy-number log-ratios for every pair.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Barcodes, samples, signals and sample collections
//! - **rename**: Regex rewrite rules for pairing keys and display names
//! - **pair**: Tumor/normal classification, matching and selection
//! - **ratio**: Log-ratio computation for aligned pairs
//! - **provider**: Data-set discovery and loading
//! - **pipeline**: Configuration and end-to-end execution
//!
//! # Example
//!
//! ```no_run
//! use paired_cn::prelude::*;
//!
//! let provider = InMemoryProvider::new().with_data_set(
//!     "cohort",
//!     vec![
//!         ("TCGA-02-0001-01C-01D-0182-01", Signal::raw(vec![400.0, 120.0])),
//!         ("TCGA-02-0001-10A-01D-0182-01", Signal::raw(vec![100.0, 120.0])),
//!     ],
//! );
//!
//! let outcomes = Pipeline::new()
//!     .log_base(2.0)
//!     .run(&provider)
//!     .unwrap();
//! for outcome in outcomes {
//!     let output = outcome.result.unwrap();
//!     println!("{:?}", output.display_names);
//! }
//! ```

pub mod data;
pub mod error;
pub mod pair;
pub mod pipeline;
pub mod provider;
pub mod ratio;
pub mod rename;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        intersect_names, names_of, Barcode, BarcodeGrammar, BarcodeParser, LoadReport, Sample,
        SampleCollection, Signal, SignalKind,
    };
    pub use crate::error::{CnError, Result};
    pub use crate::pair::{verify_alignment, PairedSamples, PairingEngine, PairingReport, Selection};
    pub use crate::pipeline::{CompiledConfig, DataSetOutcome, PairingConfig, Pipeline, PipelineOutput};
    pub use crate::provider::{DataSetProvider, InMemoryProvider, LoadFilter};
    pub use crate::ratio::{
        compute_ratios, RatioEngine, RatioMode, RatioRecord, RatioSet, SkippedPair,
        DEFAULT_LOG_BASE, DEFAULT_SEPARATOR,
    };
    pub use crate::rename::{rewrite, CompiledRules, NameRewriter, RewriteRule, RuleSet};
}
