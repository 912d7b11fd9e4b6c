//! Tumor/normal copy-number log-ratios.
//!
//! For every aligned pair the ratio mode follows from the signal kind:
//!
//! | Signals | Mode | Per-locus value |
//! |---------|------|-----------------|
//! | raw / raw | [`RatioMode::RawIntensity`] | `log_b(t / n)` |
//! | logged / logged | [`RatioMode::LogDifference`] | `t - n` |
//! | mixed | rejected | |
//!
//! Loci where the value is not finite keep the non-finite value and are
//! listed on the record. In raw mode a zero intensity yields `+inf`, `-inf`
//! or `NaN` and a negative intensity always yields `NaN`.

use crate::data::{Sample, SampleCollection, SignalKind};
use crate::error::{CnError, Result};
use crate::pair::{verify_alignment, PairedSamples};
use crate::rename::NameRewriter;
use log::{info, warn};
use nalgebra::DVector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default logarithm base for copy-number ratios.
pub const DEFAULT_LOG_BASE: f64 = 2.0;

/// Default separator between tumor and normal names in a ratio name.
pub const DEFAULT_SEPARATOR: &str = ",ref=";

/// How a record's values were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioMode {
    /// `log_b(tumor / normal)` of raw intensities.
    RawIntensity,
    /// `tumor - normal` of already-logged values.
    LogDifference,
}

impl RatioMode {
    /// Mode implied by the signal kinds of a pair, if they agree.
    pub fn for_kinds(tumor: SignalKind, normal: SignalKind) -> Option<Self> {
        match (tumor, normal) {
            (SignalKind::RawIntensity, SignalKind::RawIntensity) => Some(RatioMode::RawIntensity),
            (SignalKind::LogTransformed, SignalKind::LogTransformed) => {
                Some(RatioMode::LogDifference)
            }
            _ => None,
        }
    }
}

/// Log-ratio signal of one tumor against its normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    /// `tumor label` + separator + `normal label`.
    pub name: String,
    /// Identity shared by the tumor and the normal.
    pub patient: String,
    pub tumor: String,
    pub normal: String,
    pub mode: RatioMode,
    /// Per-locus log-ratios. Non-finite entries serialize as `null`.
    pub values: DVector<f64>,
    /// Loci whose value is not finite.
    pub nonfinite_loci: Vec<usize>,
}

impl RatioRecord {
    /// Number of loci.
    pub fn n_loci(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, locus: usize) -> Option<f64> {
        self.values.get(locus).copied()
    }
}

/// A pair that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPair {
    pub patient: String,
    pub reason: String,
}

/// Ratio records of a pairing run, in pairing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub records: Vec<RatioRecord>,
    pub skipped: Vec<SkippedPair>,
}

impl RatioSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RatioRecord> + '_ {
        self.records.iter()
    }

    /// Record addressed by its composite name.
    pub fn get(&self, name: &str) -> Option<&RatioRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Compact names produced by a display rule.
    pub fn display_names(&self, rule: &NameRewriter) -> Vec<String> {
        self.records.iter().map(|r| rule.rewrite(&r.name)).collect()
    }

    /// Total number of non-finite loci over all records.
    pub fn n_nonfinite(&self) -> usize {
        self.records.iter().map(|r| r.nonfinite_loci.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Computes ratio records from aligned tumor and normal collections.
#[derive(Debug, Clone)]
pub struct RatioEngine {
    log_base: f64,
    separator: String,
}

impl Default for RatioEngine {
    fn default() -> Self {
        Self {
            log_base: DEFAULT_LOG_BASE,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl RatioEngine {
    /// Create an engine with the given logarithm base.
    pub fn new(log_base: f64) -> Result<Self> {
        validate_log_base(log_base)?;
        Ok(Self {
            log_base,
            ..Self::default()
        })
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn log_base(&self) -> f64 {
        self.log_base
    }

    /// Compute ratios for the output of the pairing engine.
    pub fn compute_paired(&self, paired: &PairedSamples) -> Result<RatioSet> {
        self.compute(&paired.tumors, &paired.normals)
    }

    /// Compute one record per aligned pair.
    ///
    /// The collections must carry identical ordered full names; otherwise
    /// this is a [`CnError::Integrity`] and nothing is computed. A pair
    /// whose signals disagree in kind or length is skipped; if every pair
    /// is skipped the run fails with [`CnError::EmptyResult`].
    pub fn compute(&self, tumors: &SampleCollection, normals: &SampleCollection) -> Result<RatioSet> {
        verify_alignment(tumors, normals, "ratio")?;
        if tumors.is_empty() {
            return Err(CnError::empty("ratio", "no tumor-normal pairs to compute"));
        }

        let outcomes: Vec<(String, Result<RatioRecord>)> = tumors
            .samples()
            .par_iter()
            .zip(normals.samples().par_iter())
            .map(|(tumor, normal)| (tumor.full_name().to_string(), self.ratio(tumor, normal)))
            .collect();

        let mut set = RatioSet::default();
        for (patient, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    if !record.nonfinite_loci.is_empty() {
                        warn!(
                            "{}: {} of {} loci are not finite",
                            record.name,
                            record.nonfinite_loci.len(),
                            record.n_loci()
                        );
                    }
                    set.records.push(record);
                }
                Err(err) => {
                    warn!("Skipping pair '{}': {}", patient, err);
                    set.skipped.push(SkippedPair {
                        patient,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if set.records.is_empty() {
            return Err(CnError::empty(
                "ratio",
                format!("all {} pairs were skipped", set.skipped.len()),
            ));
        }
        info!(
            "Computed {} ratio records ({} skipped)",
            set.records.len(),
            set.skipped.len()
        );
        Ok(set)
    }

    /// Ratio record of a single pair.
    pub fn ratio(&self, tumor: &Sample, normal: &Sample) -> Result<RatioRecord> {
        let t = tumor.signal();
        let n = normal.signal();
        let mode = RatioMode::for_kinds(t.kind(), n.kind()).ok_or_else(|| {
            CnError::SignalKindMismatch {
                tumor: tumor.label().to_string(),
                normal: normal.label().to_string(),
            }
        })?;
        if t.len() != n.len() {
            return Err(CnError::DimensionMismatch {
                context: format!("loci of '{}'", normal.label()),
                expected: t.len(),
                actual: n.len(),
            });
        }

        let values = match mode {
            RatioMode::RawIntensity => {
                let base = self.log_base;
                t.values().zip_map(n.values(), |a, b| raw_log_ratio(a, b, base))
            }
            RatioMode::LogDifference => t.values() - n.values(),
        };
        let nonfinite_loci = values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_finite())
            .map(|(i, _)| i)
            .collect();

        Ok(RatioRecord {
            name: format!("{}{}{}", tumor.label(), self.separator, normal.label()),
            patient: tumor.full_name().to_string(),
            tumor: tumor.label().to_string(),
            normal: normal.label().to_string(),
            mode,
            values,
            nonfinite_loci,
        })
    }
}

/// Compute ratios with the default separator.
pub fn compute_ratios(
    tumors: &SampleCollection,
    normals: &SampleCollection,
    log_base: f64,
) -> Result<RatioSet> {
    RatioEngine::new(log_base)?.compute(tumors, normals)
}

pub(crate) fn validate_log_base(log_base: f64) -> Result<()> {
    if !log_base.is_finite() || log_base <= 0.0 || log_base == 1.0 {
        return Err(CnError::InvalidParameter(format!(
            "Logarithm base must be positive and not 1; got {}",
            log_base
        )));
    }
    Ok(())
}

/// `log_b(t / n)`, or `NaN` if either intensity is negative.
#[inline]
fn raw_log_ratio(t: f64, n: f64, base: f64) -> f64 {
    if t < 0.0 || n < 0.0 {
        return f64::NAN;
    }
    log_with_base(t / n, base)
}

#[inline]
fn log_with_base(x: f64, base: f64) -> f64 {
    if base == 2.0 {
        x.log2()
    } else {
        x.ln() / base.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BarcodeGrammar, BarcodeParser, Signal};
    use approx::assert_relative_eq;

    fn parser() -> BarcodeParser {
        BarcodeParser::new(BarcodeGrammar::new("P[0-9]+", "[0-9]{2}[A-Z]")).unwrap()
    }

    fn patient_of(name: &str) -> String {
        name.split('-').next().unwrap_or(name).to_string()
    }

    /// Load records and key them by patient, as the pairing engine does.
    fn aligned(records: Vec<(&str, Signal)>) -> SampleCollection {
        SampleCollection::from_records(records, &parser())
            .collection
            .rename(patient_of)
    }

    #[test]
    fn test_raw_intensity_log2() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![400.0, 100.0, 50.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![100.0, 100.0, 100.0]))]);
        let set = compute_ratios(&tumors, &normals, 2.0).unwrap();

        let record = &set.records[0];
        assert_eq!(record.mode, RatioMode::RawIntensity);
        assert_relative_eq!(record.values[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(record.values[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(record.values[2], -1.0, epsilon = 1e-12);
        assert!(record.nonfinite_loci.is_empty());
    }

    #[test]
    fn test_record_name_joins_labels() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![1.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![1.0]))]);
        let set = compute_ratios(&tumors, &normals, 2.0).unwrap();
        assert_eq!(set.names(), vec!["P1-01A,ref=P1-10A"]);
        assert!(set.get("P1-01A,ref=P1-10A").is_some());
        assert_eq!(set.records[0].patient, "P1");
    }

    #[test]
    fn test_custom_separator_and_base() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![1000.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![10.0]))]);
        let engine = RatioEngine::new(10.0).unwrap().with_separator(";ref=");
        let set = engine.compute(&tumors, &normals).unwrap();
        assert_eq!(set.records[0].name, "P1-01A;ref=P1-10A");
        assert_relative_eq!(set.records[0].values[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_normal_is_non_finite() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![10.0, 10.0, 0.0, 10.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![5.0, 0.0, 0.0, -1.0]))]);
        let set = compute_ratios(&tumors, &normals, 2.0).unwrap();

        let record = &set.records[0];
        assert_relative_eq!(record.values[0], 1.0, epsilon = 1e-12);
        assert!(record.values[1].is_infinite());
        assert!(record.values[2].is_nan());
        assert!(record.values[3].is_nan());
        assert_eq!(record.nonfinite_loci, vec![1, 2, 3]);
        assert_eq!(set.n_nonfinite(), 3);
    }

    #[test]
    fn test_negative_intensities_are_non_finite() {
        // Both negative gives a positive quotient that must still be flagged
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![-4.0, -1.0, 4.0, -0.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![-1.0, -1.0, 1.0, 2.0]))]);
        let set = compute_ratios(&tumors, &normals, 10.0).unwrap();

        let record = &set.records[0];
        assert!(record.values[0].is_nan());
        assert!(record.values[1].is_nan());
        assert_relative_eq!(record.values[2], 4.0_f64.log10(), epsilon = 1e-12);
        assert_eq!(record.values[3], f64::NEG_INFINITY);
        assert_eq!(record.nonfinite_loci, vec![0, 1, 3]);
    }

    #[test]
    fn test_pre_logged_uses_difference() {
        // Values that would produce NaN under the raw formula
        let tumors = aligned(vec![("P1-01A", Signal::logged(vec![-1.0, 0.5]))]);
        let normals = aligned(vec![("P1-10A", Signal::logged(vec![-2.0, 1.5]))]);
        let set = compute_ratios(&tumors, &normals, 2.0).unwrap();

        let record = &set.records[0];
        assert_eq!(record.mode, RatioMode::LogDifference);
        assert_relative_eq!(record.values[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(record.values[1], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_raw_matches_difference_of_logs() {
        let t = vec![400.0, 3.7, 1e-3, 88.0];
        let n = vec![100.0, 12.1, 2e-2, 88.0];
        let raw = compute_ratios(
            &aligned(vec![("P1-01A", Signal::raw(t.clone()))]),
            &aligned(vec![("P1-10A", Signal::raw(n.clone()))]),
            2.0,
        )
        .unwrap();
        let logged = compute_ratios(
            &aligned(vec![("P1-01A", Signal::logged(t.iter().map(|x| x.log2()).collect()))]),
            &aligned(vec![("P1-10A", Signal::logged(n.iter().map(|x| x.log2()).collect()))]),
            2.0,
        )
        .unwrap();

        for locus in 0..t.len() {
            assert_relative_eq!(
                raw.records[0].values[locus],
                logged.records[0].values[locus],
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_mixed_kinds_are_skipped() {
        let tumors = aligned(vec![
            ("P1-01A", Signal::raw(vec![2.0])),
            ("P2-01A", Signal::raw(vec![2.0])),
        ]);
        let normals = aligned(vec![
            ("P1-10A", Signal::logged(vec![1.0])),
            ("P2-10A", Signal::raw(vec![1.0])),
        ]);
        let set = compute_ratios(&tumors, &normals, 2.0).unwrap();
        assert_eq!(set.names(), vec!["P2-01A,ref=P2-10A"]);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].patient, "P1");
    }

    #[test]
    fn test_all_pairs_skipped_is_empty_result() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![2.0, 3.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![1.0]))]);
        let err = compute_ratios(&tumors, &normals, 2.0).unwrap_err();
        assert!(matches!(err, CnError::EmptyResult { .. }));
    }

    #[test]
    fn test_misaligned_input_is_integrity_failure() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![1.0]))]);
        let normals = aligned(vec![("P2-10A", Signal::raw(vec![1.0]))]);
        let err = compute_ratios(&tumors, &normals, 2.0).unwrap_err();
        assert!(matches!(err, CnError::Integrity { .. }));
    }

    #[test]
    fn test_invalid_log_base() {
        assert!(RatioEngine::new(1.0).is_err());
        assert!(RatioEngine::new(0.0).is_err());
        assert!(RatioEngine::new(f64::NAN).is_err());
        assert_eq!(RatioEngine::default().log_base(), DEFAULT_LOG_BASE);
    }

    #[test]
    fn test_mode_for_kinds() {
        use crate::data::SignalKind::*;
        assert_eq!(RatioMode::for_kinds(RawIntensity, RawIntensity), Some(RatioMode::RawIntensity));
        assert_eq!(
            RatioMode::for_kinds(LogTransformed, LogTransformed),
            Some(RatioMode::LogDifference)
        );
        assert_eq!(RatioMode::for_kinds(RawIntensity, LogTransformed), None);
    }

    #[test]
    fn test_json_export() {
        let tumors = aligned(vec![("P1-01A", Signal::raw(vec![4.0]))]);
        let normals = aligned(vec![("P1-10A", Signal::raw(vec![1.0]))]);
        let json = compute_ratios(&tumors, &normals, 2.0).unwrap().to_json().unwrap();
        assert!(json.contains("P1-01A,ref=P1-10A"));
        assert!(json.contains("RawIntensity"));
    }
}
