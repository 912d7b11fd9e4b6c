//! Data-set providers.
//!
//! A provider lists the data sets it knows about and loads one of them into
//! a [`SampleCollection`]. Where the signal comes from is the provider's
//! concern; this crate only ships an in-memory implementation.

mod memory;

pub use memory::InMemoryProvider;

use crate::data::{BarcodeParser, LoadReport, SignalKind};
use crate::error::Result;

/// Restrictions applied while loading a data set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadFilter {
    /// Every sample must carry all of these full-name tags.
    pub tags: Vec<String>,
    /// Only samples with this signal kind are loaded.
    pub kind: Option<SignalKind>,
}

impl LoadFilter {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kind(mut self, kind: SignalKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Source of sample collections.
pub trait DataSetProvider {
    /// Identifiers of the available data sets.
    fn list_data_sets(&self) -> Vec<String>;

    /// Load a data set, parsing labels with `parser`.
    ///
    /// Samples are returned sorted by label so that first-seen
    /// deduplication downstream is deterministic.
    fn load(&self, id: &str, filter: &LoadFilter, parser: &BarcodeParser) -> Result<LoadReport>;
}
