//! Regex-based name rewriting.
//!
//! Rules are data: a pattern and a replacement string. Patterns may use the
//! `{patient}` and `{sample_id}` placeholders, which expand to the
//! barcode grammar's sub-patterns as non-capturing groups. Replacements use
//! the `regex` crate syntax (`${1}`, `${name}`).

use crate::data::BarcodeGrammar;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// An uncompiled rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Collapse a label to its patient identifier.
    pub fn patient_identity() -> Self {
        Self::new("^({patient})-.*$", "${1}")
    }

    /// Collapse a label to `patient,sampleId,tag`.
    pub fn sample_display() -> Self {
        Self::new("^({patient})-({sample_id})-*(.*)$", "${1},${2},${3}")
    }

    /// Collapse `tumor,ref=normal` to `patient,TvsN,tagTvstagN`.
    pub fn pair_display() -> Self {
        Self::new(
            "^({patient})-({sample_id})-*(.*?),ref=({patient})-({sample_id})-*(.*)$",
            "${1},${2}vs${5},${3}vs${6}",
        )
    }

    /// Compile against a barcode grammar.
    pub fn compile(&self, grammar: &BarcodeGrammar) -> Result<NameRewriter> {
        let regex = Regex::new(&grammar.expand(&self.pattern))?;
        Ok(NameRewriter {
            regex,
            replacement: self.replacement.clone(),
        })
    }
}

/// The rule sets used by the pairing and ratio stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Maps a label to the key tumors and normals are matched on.
    pub identity: RewriteRule,
    /// Display form of a single sample.
    pub sample_display: RewriteRule,
    /// Display form of a tumor/normal ratio name.
    pub pair_display: RewriteRule,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            identity: RewriteRule::patient_identity(),
            sample_display: RewriteRule::sample_display(),
            pair_display: RewriteRule::pair_display(),
        }
    }
}

impl RuleSet {
    pub fn compile(&self, grammar: &BarcodeGrammar) -> Result<CompiledRules> {
        Ok(CompiledRules {
            identity: self.identity.compile(grammar)?,
            sample_display: self.sample_display.compile(grammar)?,
            pair_display: self.pair_display.compile(grammar)?,
        })
    }
}

/// Compiled counterpart of [`RuleSet`].
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub identity: NameRewriter,
    pub sample_display: NameRewriter,
    pub pair_display: NameRewriter,
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct NameRewriter {
    regex: Regex,
    replacement: String,
}

impl NameRewriter {
    /// Rewrite `name`; names the pattern does not match are returned as is.
    pub fn rewrite(&self, name: &str) -> String {
        self.regex.replace(name, self.replacement.as_str()).into_owned()
    }

    /// Rewrite `name`, or `None` if the pattern does not match.
    pub fn try_rewrite(&self, name: &str) -> Option<String> {
        self.regex
            .is_match(name)
            .then(|| self.rewrite(name))
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Apply a compiled rule to a name.
pub fn rewrite(name: &str, rule: &NameRewriter) -> String {
    rule.rewrite(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcga_rules() -> CompiledRules {
        RuleSet::default().compile(&BarcodeGrammar::default()).unwrap()
    }

    #[test]
    fn test_identity_rule() {
        let rules = tcga_rules();
        assert_eq!(
            rules.identity.rewrite("TCGA-02-0001-01C-01D-0182-01,BRCA"),
            "TCGA-02-0001"
        );
    }

    #[test]
    fn test_sample_display_rule() {
        let rules = tcga_rules();
        assert_eq!(
            rewrite("TCGA-02-0001-01C-01D-0182-01", &rules.sample_display),
            "TCGA-02-0001,01C,01D-0182-01"
        );
    }

    #[test]
    fn test_pair_display_rule() {
        let rules = tcga_rules();
        let name = "TCGA-02-0001-01C-01D-0182-01,ref=TCGA-02-0001-10A-01D-0182-01";
        assert_eq!(
            rules.pair_display.rewrite(name),
            "TCGA-02-0001,01Cvs10A,01D-0182-01vs01D-0182-01"
        );
    }

    #[test]
    fn test_unmatched_name_is_unchanged() {
        let rules = tcga_rules();
        assert_eq!(rules.sample_display.rewrite("not-a-barcode"), "not-a-barcode");
        assert_eq!(rules.sample_display.try_rewrite("not-a-barcode"), None);
    }

    #[test]
    fn test_rules_follow_grammar() {
        let grammar = BarcodeGrammar::new("P[0-9]+", "[0-9]{2}[A-Z]");
        let rules = RuleSet::default().compile(&grammar).unwrap();
        assert_eq!(rules.identity.rewrite("P12-01A"), "P12");
        assert_eq!(rules.pair_display.rewrite("P1-01A,ref=P1-10B"), "P1,01Avs10B,vs");
    }

    #[test]
    fn test_custom_rule() {
        let grammar = BarcodeGrammar::default();
        let rule = RewriteRule::new("^({patient})-({sample_id}).*$", "${2}:${1}")
            .compile(&grammar)
            .unwrap();
        assert_eq!(rule.rewrite("TCGA-02-0001-10A-01D"), "10A:TCGA-02-0001");
    }

    #[test]
    fn test_bad_pattern_fails_to_compile() {
        let rule = RewriteRule::new("^(unclosed", "${1}");
        assert!(rule.compile(&BarcodeGrammar::default()).is_err());
    }
}
