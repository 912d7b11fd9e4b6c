//! In-memory data-set provider.

use crate::data::{BarcodeParser, LoadReport, Sample, SampleCollection, Signal};
use crate::error::{CnError, Result};
use crate::provider::{DataSetProvider, LoadFilter};
use log::debug;
use std::collections::BTreeMap;

/// Data sets held in memory as `(label, signal)` records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    data_sets: BTreeMap<String, Vec<(String, Signal)>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a data set.
    pub fn insert<I, S>(&mut self, id: impl Into<String>, records: I)
    where
        I: IntoIterator<Item = (S, Signal)>,
        S: Into<String>,
    {
        let records = records.into_iter().map(|(l, s)| (l.into(), s)).collect();
        self.data_sets.insert(id.into(), records);
    }

    pub fn with_data_set<I, S>(mut self, id: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = (S, Signal)>,
        S: Into<String>,
    {
        self.insert(id, records);
        self
    }
}

impl DataSetProvider for InMemoryProvider {
    fn list_data_sets(&self) -> Vec<String> {
        self.data_sets.keys().cloned().collect()
    }

    fn load(&self, id: &str, filter: &LoadFilter, parser: &BarcodeParser) -> Result<LoadReport> {
        let records = self
            .data_sets
            .get(id)
            .ok_or_else(|| CnError::empty("data sets", format!("no data set named '{}'", id)))?;

        let selected = records
            .iter()
            .filter(|(_, signal)| filter.kind.map_or(true, |k| signal.kind() == k))
            .cloned();
        let report = SampleCollection::from_records(selected, parser);

        let collection = report
            .collection
            .filter(|s| has_tags(s, &filter.tags))
            .sorted_by_label();
        debug!("Loaded {} samples from '{}'", collection.len(), id);

        Ok(LoadReport {
            collection,
            rejected: report.rejected,
        })
    }
}

fn has_tags(sample: &Sample, required: &[String]) -> bool {
    let tags = sample.tags();
    required.iter().all(|r| tags.contains(&r.as_str()))
}
