//! Tumor/normal pairing.
//!
//! Pairing proceeds in fixed stages:
//!
//! 1. Partition the source into tumors and normals by sample-type code.
//! 2. Key every sample by its patient identity and intersect the keys.
//! 3. Narrow the candidates with a [`Selection`].
//! 4. Subset both sides to the chosen identities and keep the first-seen
//!    sample per identity, so replicates (n > 2) collapse to one per side.
//! 5. Verify that both sides carry the same ordered key sequence.

use crate::data::{intersect_names, names_of, SampleCollection};
use crate::error::{CnError, Result};
use crate::pair::selection::Selection;
use crate::rename::NameRewriter;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Diagnostics of a successful pairing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingReport {
    /// Identities with at least one tumor and one normal.
    pub candidates: Vec<String>,
    /// Identities kept after selection, in pairing order.
    pub selected: Vec<String>,
    /// Identities with tumors but no normal.
    pub unpaired_tumors: Vec<String>,
    /// Identities with normals but no tumor.
    pub unpaired_normals: Vec<String>,
    /// Tumor replicates removed by deduplication.
    pub dropped_tumor_replicates: usize,
    /// Normal replicates removed by deduplication.
    pub dropped_normal_replicates: usize,
}

impl PairingReport {
    /// True if some samples could not be paired or were deduplicated away.
    pub fn is_partial(&self) -> bool {
        !self.unpaired_tumors.is_empty()
            || !self.unpaired_normals.is_empty()
            || self.dropped_tumor_replicates > 0
            || self.dropped_normal_replicates > 0
    }
}

impl std::fmt::Display for PairingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pairing Report")?;
        writeln!(f, "  Candidates:        {}", self.candidates.len())?;
        writeln!(f, "  Selected pairs:    {}", self.selected.len())?;
        writeln!(f, "  Unpaired tumors:   {}", self.unpaired_tumors.len())?;
        writeln!(f, "  Unpaired normals:  {}", self.unpaired_normals.len())?;
        writeln!(
            f,
            "  Dropped replicates: {} tumor, {} normal",
            self.dropped_tumor_replicates, self.dropped_normal_replicates
        )?;
        Ok(())
    }
}

/// Index-aligned tumor and normal collections.
///
/// Both collections are keyed by patient identity and `tumors[i]` belongs
/// to the same patient as `normals[i]`.
#[derive(Debug, Clone)]
pub struct PairedSamples {
    pub tumors: SampleCollection,
    pub normals: SampleCollection,
    pub report: PairingReport,
}

impl PairedSamples {
    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.tumors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tumors.is_empty()
    }
}

/// Classifies and matches samples.
#[derive(Debug, Clone)]
pub struct PairingEngine {
    tumor_types: Regex,
    normal_types: Regex,
    identity: NameRewriter,
}

impl PairingEngine {
    /// Create an engine from sample-type patterns and an identity rule.
    pub fn new(tumor_types: Regex, normal_types: Regex, identity: NameRewriter) -> Self {
        Self {
            tumor_types,
            normal_types,
            identity,
        }
    }

    /// Pair the tumors and normals of `source`.
    ///
    /// Fails with [`CnError::EmptyResult`] when no identity has both a tumor
    /// and a normal, or when the selection keeps nothing, and with
    /// [`CnError::Integrity`] when the aligned key sequences differ.
    pub fn pair(&self, source: &SampleCollection, selection: &Selection) -> Result<PairedSamples> {
        let tumors = source
            .filter_by_type(&self.tumor_types)
            .rename_from_label(|label| self.identity.rewrite(label));
        let normals = source
            .filter_by_type(&self.normal_types)
            .rename_from_label(|label| self.identity.rewrite(label));
        info!(
            "Partitioned {} samples into {} tumors and {} normals",
            source.len(),
            tumors.len(),
            normals.len()
        );

        let candidates = intersect_names(&tumors, &normals);
        if candidates.is_empty() {
            return Err(CnError::empty(
                "pairing",
                format!(
                    "no tumor-normal pairs found among {} tumors and {} normals",
                    tumors.len(),
                    normals.len()
                ),
            ));
        }

        let unpaired_tumors = unmatched(&tumors, &candidates);
        let unpaired_normals = unmatched(&normals, &candidates);
        if !unpaired_tumors.is_empty() {
            warn!("Tumors without a normal: {}", unpaired_tumors.join(", "));
        }
        if !unpaired_normals.is_empty() {
            warn!("Normals without a tumor: {}", unpaired_normals.join(", "));
        }

        let selected = selection.apply(&candidates);
        if selected.is_empty() {
            return Err(CnError::empty(
                "selection",
                format!("none of {} candidate pairs were selected", candidates.len()),
            ));
        }
        debug!("Selected identities: {:?}", selected);

        let tumor_subset = tumors.subset(&selected);
        let normal_subset = normals.subset(&selected);
        let paired_tumors = tumor_subset.dedupe_by_name();
        let paired_normals = normal_subset.dedupe_by_name();

        verify_alignment(&paired_tumors, &paired_normals, "pairing")?;

        let report = PairingReport {
            dropped_tumor_replicates: tumor_subset.len() - paired_tumors.len(),
            dropped_normal_replicates: normal_subset.len() - paired_normals.len(),
            candidates,
            selected,
            unpaired_tumors,
            unpaired_normals,
        };
        info!("Paired {} tumor-normal pairs", paired_tumors.len());

        Ok(PairedSamples {
            tumors: paired_tumors,
            normals: paired_normals,
            report,
        })
    }
}

/// Check that two collections carry identical ordered full names.
///
/// The first mismatching position is reported as [`CnError::Integrity`].
pub fn verify_alignment(
    tumors: &SampleCollection,
    normals: &SampleCollection,
    stage: &str,
) -> Result<()> {
    let t = names_of(tumors);
    let n = names_of(normals);
    if t == n {
        return Ok(());
    }

    let index = t
        .iter()
        .zip(&n)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| t.len().min(n.len()));
    Err(CnError::Integrity {
        stage: stage.to_string(),
        index,
        tumor: t.get(index).cloned().unwrap_or_else(|| "<none>".to_string()),
        normal: n.get(index).cloned().unwrap_or_else(|| "<none>".to_string()),
    })
}

fn unmatched(collection: &SampleCollection, candidates: &[String]) -> Vec<String> {
    let names: BTreeSet<&str> = collection.iter().map(|s| s.full_name()).collect();
    names
        .into_iter()
        .filter(|name| !candidates.iter().any(|c| c == name))
        .map(str::to_string)
        .collect()
}
