//! Tumor/normal pairing.

pub mod engine;
pub mod selection;

pub use engine::{verify_alignment, PairedSamples, PairingEngine, PairingReport};
pub use selection::{SelectFn, Selection};
