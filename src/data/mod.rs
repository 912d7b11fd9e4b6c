//! Core data structures: barcodes, samples and sample collections.

mod barcode;
mod collection;
mod sample;

pub use barcode::{Barcode, BarcodeGrammar, BarcodeParser};
pub use collection::{intersect_names, names_of, LoadReport, SampleCollection};
pub use sample::{Sample, Signal, SignalKind};
