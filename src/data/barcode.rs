//! Biospecimen barcode grammar and parser.
//!
//! A barcode has the shape `PATIENT-SAMPLEID[-TAG]`, where the first two
//! characters of `SAMPLEID` are the numeric sample-type code. The patient and
//! sample-id sub-patterns come from the biospecimen registry and are
//! configuration, so the parser itself is pattern-agnostic.

use crate::error::{CnError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sub-patterns describing a registry's barcode format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeGrammar {
    /// Pattern matching the patient identifier (e.g. `TCGA-02-0001`).
    pub patient_pattern: String,
    /// Pattern matching the sample identifier (e.g. `01C`).
    pub sample_id_pattern: String,
}

impl Default for BarcodeGrammar {
    /// The TCGA registry format.
    fn default() -> Self {
        Self {
            patient_pattern: "TCGA-[0-9A-Z]{2}-[0-9A-Z]{4}".to_string(),
            sample_id_pattern: "[0-9]{2}[A-Z]".to_string(),
        }
    }
}

impl BarcodeGrammar {
    pub fn new(patient_pattern: impl Into<String>, sample_id_pattern: impl Into<String>) -> Self {
        Self {
            patient_pattern: patient_pattern.into(),
            sample_id_pattern: sample_id_pattern.into(),
        }
    }

    /// Substitute `{patient}` and `{sample_id}` placeholders with the
    /// grammar's sub-patterns, each wrapped as a non-capturing group so
    /// that group numbering in the template is unaffected.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{patient}", &format!("(?:{})", self.patient_pattern))
            .replace("{sample_id}", &format!("(?:{})", self.sample_id_pattern))
    }
}

/// Structured fields of a parsed barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Barcode {
    pub patient: String,
    pub sample_type: String,
    pub sample_id: String,
    pub tag: String,
}

/// Parser built from a [`BarcodeGrammar`].
#[derive(Debug, Clone)]
pub struct BarcodeParser {
    grammar: BarcodeGrammar,
    regex: Regex,
}

impl BarcodeParser {
    /// Compile the combined pattern `^(patient)-(sampleId)-*(.*)$`.
    pub fn new(grammar: BarcodeGrammar) -> Result<Self> {
        let pattern = format!(
            "^(?P<patient>{})-(?P<sample_id>{})-*(?P<tag>.*)$",
            grammar.patient_pattern, grammar.sample_id_pattern
        );
        let regex = Regex::new(&pattern)?;
        Ok(Self { grammar, regex })
    }

    pub fn grammar(&self) -> &BarcodeGrammar {
        &self.grammar
    }

    /// Parse a label into its barcode fields.
    ///
    /// Labels that do not match the grammar, or whose sample id does not
    /// start with a two-digit sample-type code, are a [`CnError::Parse`].
    pub fn parse(&self, label: &str) -> Result<Barcode> {
        let caps = self.regex.captures(label).ok_or_else(|| CnError::Parse {
            label: label.to_string(),
            reason: "does not match the barcode grammar".to_string(),
        })?;

        let patient = caps.name("patient").map_or("", |m| m.as_str());
        let sample_id = caps.name("sample_id").map_or("", |m| m.as_str());
        let tag = caps.name("tag").map_or("", |m| m.as_str());

        let sample_type = sample_id.get(..2).filter(|code| {
            code.bytes().all(|b| b.is_ascii_digit())
        });
        let Some(sample_type) = sample_type else {
            return Err(CnError::Parse {
                label: label.to_string(),
                reason: format!("sample id '{}' has no two-digit sample-type code", sample_id),
            });
        };

        Ok(Barcode {
            patient: patient.to_string(),
            sample_type: sample_type.to_string(),
            sample_id: sample_id.to_string(),
            tag: tag.to_string(),
        })
    }
}
