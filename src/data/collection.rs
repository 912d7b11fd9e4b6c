//! Ordered sample collections keyed by full name.

use crate::data::barcode::BarcodeParser;
use crate::data::sample::{Sample, Signal};
use crate::error::{CnError, Result};
use log::warn;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};

/// An ordered collection of samples.
///
/// Collections built with [`SampleCollection::new`] or
/// [`SampleCollection::from_records`] have unique full names. A
/// [`rename`](SampleCollection::rename) may introduce collisions; callers
/// restore uniqueness with [`dedupe_by_name`](SampleCollection::dedupe_by_name).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCollection {
    samples: Vec<Sample>,
}

/// Outcome of loading labelled records into a collection.
#[derive(Debug)]
pub struct LoadReport {
    pub collection: SampleCollection,
    /// Labels that could not be loaded, one error each.
    pub rejected: Vec<CnError>,
}

impl SampleCollection {
    /// Create a collection, rejecting duplicate full names.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(samples.len());
        for sample in &samples {
            if !seen.insert(sample.full_name()) {
                return Err(CnError::InvalidParameter(format!(
                    "Duplicate full name '{}' in collection",
                    sample.full_name()
                )));
            }
        }
        Ok(Self { samples })
    }

    /// Parse and load `(label, signal)` records.
    ///
    /// A malformed label or a repeated label rejects only that record; the
    /// remaining records are still loaded.
    pub fn from_records<I, S>(records: I, parser: &BarcodeParser) -> LoadReport
    where
        I: IntoIterator<Item = (S, Signal)>,
        S: Into<String>,
    {
        let mut samples = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for (label, signal) in records {
            let label: String = label.into();
            if seen.contains(&label) {
                warn!("Skipping repeated label '{}'", label);
                rejected.push(CnError::Parse {
                    label,
                    reason: "repeated label".to_string(),
                });
                continue;
            }
            match Sample::new(label.clone(), signal, parser) {
                Ok(sample) => {
                    seen.insert(label);
                    samples.push(sample);
                }
                Err(err) => {
                    warn!("{}", err);
                    rejected.push(err);
                }
            }
        }

        LoadReport {
            collection: Self { samples },
            rejected,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// First sample addressed by `full_name`.
    pub fn get(&self, full_name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.full_name() == full_name)
    }

    /// Ordered full names.
    pub fn names(&self) -> Vec<&str> {
        self.samples.iter().map(Sample::full_name).collect()
    }

    /// Samples whose sample-type code matches `pattern` (e.g. `^01`).
    pub fn filter_by_type(&self, pattern: &Regex) -> Self {
        self.filter(|s| pattern.is_match(&s.barcode().sample_type))
    }

    /// Samples satisfying an arbitrary predicate.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Sample) -> bool,
    {
        Self {
            samples: self.samples.iter().filter(|s| predicate(*s)).cloned().collect(),
        }
    }

    /// Restrict to the given keys, in the order of `keys`.
    ///
    /// Every sample addressed by a key is kept, so replicates sharing a
    /// full name stay adjacent in their original relative order.
    pub fn subset<S: AsRef<str>>(&self, keys: &[S]) -> Self {
        let mut by_name: HashMap<&str, Vec<&Sample>> = HashMap::new();
        for sample in &self.samples {
            by_name.entry(sample.full_name()).or_default().push(sample);
        }

        let samples = keys
            .iter()
            .filter_map(|key| by_name.get(key.as_ref()))
            .flatten()
            .map(|s| (*s).clone())
            .collect();
        Self { samples }
    }

    /// Keep the first occurrence of every full name.
    pub fn dedupe_by_name(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.samples.len());
        let samples = self
            .samples
            .iter()
            .filter(|s| seen.insert(s.full_name()))
            .cloned()
            .collect();
        Self { samples }
    }

    /// Rewrite every full name. Labels are left untouched.
    pub fn rename<F>(&self, rewrite: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| s.with_full_name(rewrite(s.full_name())))
                .collect(),
        }
    }

    /// Restore every full name to the label it was loaded under.
    pub fn reset_names(&self) -> Self {
        self.rename_from_label(|label| label.to_string())
    }

    /// Rewrite full names starting from the original labels.
    pub fn rename_from_label<F>(&self, rewrite: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| s.with_full_name(rewrite(s.label())))
                .collect(),
        }
    }

    /// Sort lexicographically by label.
    pub fn sorted_by_label(mut self) -> Self {
        self.samples.sort_by(|a, b| a.label().cmp(b.label()));
        self
    }
}

/// Full names present in both collections, sorted.
pub fn intersect_names(a: &SampleCollection, b: &SampleCollection) -> Vec<String> {
    let left: BTreeSet<&str> = a.iter().map(Sample::full_name).collect();
    let right: BTreeSet<&str> = b.iter().map(Sample::full_name).collect();
    left.intersection(&right).map(|s| s.to_string()).collect()
}

/// Ordered full names of a collection.
pub fn names_of(collection: &SampleCollection) -> Vec<String> {
    collection.iter().map(|s| s.full_name().to_string()).collect()
}
