//! Samples and their per-locus signal payloads.

use crate::data::barcode::{Barcode, BarcodeParser};
use crate::error::Result;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// How a signal's values are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Raw non-negative intensities (e.g. total copy-number signal).
    RawIntensity,
    /// Values that are already log-transformed.
    LogTransformed,
}

/// Per-locus numeric signal, tagged with its representation.
///
/// The kind is fixed when the signal is loaded and never re-inferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    RawIntensity(DVector<f64>),
    LogTransformed(DVector<f64>),
}

impl Signal {
    pub fn raw(values: Vec<f64>) -> Self {
        Signal::RawIntensity(DVector::from_vec(values))
    }

    pub fn logged(values: Vec<f64>) -> Self {
        Signal::LogTransformed(DVector::from_vec(values))
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::RawIntensity(_) => SignalKind::RawIntensity,
            Signal::LogTransformed(_) => SignalKind::LogTransformed,
        }
    }

    pub fn values(&self) -> &DVector<f64> {
        match self {
            Signal::RawIntensity(v) | Signal::LogTransformed(v) => v,
        }
    }

    /// Number of loci.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// A sample of a collection.
///
/// `label` is the full name the sample was loaded under and never changes.
/// `full_name` is the key the sample is currently addressed by; it starts
/// out equal to the label and may be rewritten by
/// [`SampleCollection::rename`](crate::data::SampleCollection::rename).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    label: String,
    full_name: String,
    barcode: Barcode,
    signal: Signal,
}

impl Sample {
    /// Parse the label's barcode and build a sample.
    pub fn new(label: impl Into<String>, signal: Signal, parser: &BarcodeParser) -> Result<Self> {
        let label = label.into();
        let barcode = parser.parse(&label)?;
        Ok(Self {
            full_name: label.clone(),
            label,
            barcode,
            signal,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The full name up to the first comma.
    pub fn name(&self) -> &str {
        self.full_name
            .split_once(',')
            .map_or(self.full_name.as_str(), |(name, _)| name)
    }

    /// Comma-separated tags following the name.
    pub fn tags(&self) -> Vec<&str> {
        match self.full_name.split_once(',') {
            Some((_, rest)) => rest.split(',').filter(|t| !t.is_empty()).collect(),
            None => Vec::new(),
        }
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub(crate) fn with_full_name(&self, full_name: String) -> Self {
        Self {
            full_name,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::barcode::BarcodeGrammar;

    fn parser() -> BarcodeParser {
        BarcodeParser::new(BarcodeGrammar::new("P[0-9]+", "[0-9]{2}[A-Z]")).unwrap()
    }

    #[test]
    fn test_sample_names_and_tags() {
        let s = Sample::new("P1-01A,BRCA,total", Signal::raw(vec![1.0, 2.0]), &parser()).unwrap();
        assert_eq!(s.label(), "P1-01A,BRCA,total");
        assert_eq!(s.full_name(), s.label());
        assert_eq!(s.name(), "P1-01A");
        assert_eq!(s.tags(), vec!["BRCA", "total"]);
        assert_eq!(s.barcode().patient, "P1");
    }

    #[test]
    fn test_signal_kind_is_carried() {
        let raw = Signal::raw(vec![1.0, 2.0, 3.0]);
        let logged = Signal::logged(vec![0.0]);
        assert_eq!(raw.kind(), SignalKind::RawIntensity);
        assert_eq!(logged.kind(), SignalKind::LogTransformed);
        assert_eq!(raw.len(), 3);
        assert!(!logged.is_empty());
    }

    #[test]
    fn test_unparseable_label_is_rejected() {
        assert!(Sample::new("nope", Signal::raw(vec![]), &parser()).is_err());
    }

    #[test]
    fn test_rename_keeps_label() {
        let s = Sample::new("P2-10A", Signal::raw(vec![1.0]), &parser()).unwrap();
        let renamed = s.with_full_name("P2".to_string());
        assert_eq!(renamed.full_name(), "P2");
        assert_eq!(renamed.label(), "P2-10A");
        assert_eq!(renamed.signal(), s.signal());
    }
}
