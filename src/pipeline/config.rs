//! Pairing configuration.
//!
//! Everything that depends on the biospecimen registry (barcode grammar,
//! sample-type codes, rewrite rules) lives here so that a format change is
//! a configuration change.

use crate::data::{BarcodeGrammar, BarcodeParser};
use crate::error::{CnError, Result};
use crate::pair::PairingEngine;
use crate::provider::LoadFilter;
use crate::ratio::log_ratio::validate_log_base;
use crate::ratio::{RatioEngine, DEFAULT_LOG_BASE, DEFAULT_SEPARATOR};
use crate::rename::{CompiledRules, RuleSet};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Serializable pairing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Name of the configuration.
    pub name: String,
    pub grammar: BarcodeGrammar,
    /// Pattern on the sample-type code selecting tumors.
    pub tumor_types: String,
    /// Pattern on the sample-type code selecting normals.
    pub normal_types: String,
    pub log_base: f64,
    /// Inserted between tumor and normal labels in ratio names.
    pub ratio_separator: String,
    pub rules: RuleSet,
    /// Naming convention of the data sets to process.
    pub data_set_pattern: String,
    /// Full-name tags every loaded sample must carry.
    pub tags: Vec<String>,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            grammar: BarcodeGrammar::default(),
            tumor_types: "^01".to_string(),
            normal_types: "^1[01]".to_string(),
            log_base: DEFAULT_LOG_BASE,
            ratio_separator: DEFAULT_SEPARATOR.to_string(),
            rules: RuleSet::default(),
            data_set_pattern: ".*".to_string(),
            tags: Vec::new(),
        }
    }
}

impl PairingConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(CnError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CnError::from)
    }

    /// Validate the configuration and build its regexes and engines.
    pub fn compile(&self) -> Result<CompiledConfig> {
        validate_log_base(self.log_base)?;
        if self.ratio_separator.is_empty() {
            return Err(CnError::InvalidParameter(
                "Ratio separator must not be empty".to_string(),
            ));
        }

        let rules = self.rules.compile(&self.grammar)?;
        let pairing = PairingEngine::new(
            Regex::new(&self.tumor_types)?,
            Regex::new(&self.normal_types)?,
            rules.identity.clone(),
        );
        let ratio = RatioEngine::new(self.log_base)?.with_separator(self.ratio_separator.clone());

        Ok(CompiledConfig {
            parser: BarcodeParser::new(self.grammar.clone())?,
            pairing,
            ratio,
            rules,
            data_sets: Regex::new(&self.data_set_pattern)?,
            filter: LoadFilter::default().with_tags(self.tags.iter().cloned()),
        })
    }
}

/// A validated configuration, ready to run.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub parser: BarcodeParser,
    pub pairing: PairingEngine,
    pub ratio: RatioEngine,
    pub rules: CompiledRules,
    pub data_sets: Regex,
    pub filter: LoadFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiles() {
        let compiled = PairingConfig::default().compile().unwrap();
        assert_eq!(compiled.ratio.log_base(), 2.0);
        assert!(compiled.data_sets.is_match("anything"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PairingConfig {
            name: "brca".to_string(),
            log_base: 10.0,
            tags: vec!["total".to_string()],
            ..PairingConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        let loaded = PairingConfig::from_yaml(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
name: custom
grammar:
  patient_pattern: "P[0-9]+"
normal_types: "^10"
"#;
        let config = PairingConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, "custom");
        assert_eq!(config.grammar.patient_pattern, "P[0-9]+");
        assert_eq!(config.grammar.sample_id_pattern, "[0-9]{2}[A-Z]");
        assert_eq!(config.normal_types, "^10");
        assert_eq!(config.tumor_types, "^01");
        assert_eq!(config.log_base, 2.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_base = PairingConfig {
            log_base: 1.0,
            ..PairingConfig::default()
        };
        assert!(bad_base.compile().is_err());

        let bad_pattern = PairingConfig {
            tumor_types: "^0[".to_string(),
            ..PairingConfig::default()
        };
        assert!(matches!(bad_pattern.compile(), Err(CnError::InvalidPattern(_))));

        let bad_separator = PairingConfig {
            ratio_separator: String::new(),
            ..PairingConfig::default()
        };
        assert!(bad_separator.compile().is_err());
    }
}
