//! Pipeline runner: discover data sets, pair, compute ratios.

use crate::data::{BarcodeGrammar, SampleCollection};
use crate::error::{CnError, Result};
use crate::pair::{PairingReport, Selection};
use crate::pipeline::config::{CompiledConfig, PairingConfig};
use crate::provider::DataSetProvider;
use crate::ratio::RatioSet;
use crate::rename::RuleSet;
use log::{info, warn};

/// Result of running the pipeline on one collection.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Data set the collection was loaded from.
    pub data_set: String,
    pub pairing: PairingReport,
    pub ratios: RatioSet,
    /// Labels rejected while loading, with the reason.
    pub rejected: Vec<String>,
    /// Compact display names of the ratio records.
    pub display_names: Vec<String>,
}

/// Outcome for one data set. A failed data set does not stop the others.
#[derive(Debug)]
pub struct DataSetOutcome {
    pub data_set: String,
    pub result: Result<PipelineOutput>,
}

/// Builder for configuring and running the pairing pipeline.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: PairingConfig,
    selection: Selection,
}

impl Pipeline {
    /// Create a pipeline with the default (TCGA) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: PairingConfig) -> Self {
        Self {
            config,
            selection: Selection::All,
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn grammar(mut self, grammar: BarcodeGrammar) -> Self {
        self.config.grammar = grammar;
        self
    }

    /// Pattern on the sample-type code selecting tumors.
    pub fn tumor_types(mut self, pattern: &str) -> Self {
        self.config.tumor_types = pattern.to_string();
        self
    }

    /// Pattern on the sample-type code selecting normals.
    pub fn normal_types(mut self, pattern: &str) -> Self {
        self.config.normal_types = pattern.to_string();
        self
    }

    pub fn log_base(mut self, base: f64) -> Self {
        self.config.log_base = base;
        self
    }

    pub fn ratio_separator(mut self, separator: &str) -> Self {
        self.config.ratio_separator = separator.to_string();
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.config.rules = rules;
        self
    }

    /// Only process data sets whose identifier matches `pattern`.
    pub fn data_sets(mut self, pattern: &str) -> Self {
        self.config.data_set_pattern = pattern.to_string();
        self
    }

    /// Only load samples carrying all of `tags`.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Run every matching data set of `provider`.
    ///
    /// Fails as a whole only if the configuration is invalid or no data set
    /// matches; otherwise each data set gets its own outcome.
    pub fn run<P>(&self, provider: &P) -> Result<Vec<DataSetOutcome>>
    where
        P: DataSetProvider + ?Sized,
    {
        let compiled = self.config.compile()?;
        let ids: Vec<String> = provider
            .list_data_sets()
            .into_iter()
            .filter(|id| compiled.data_sets.is_match(id))
            .collect();
        if ids.is_empty() {
            return Err(CnError::empty(
                "data sets",
                format!("no data set matches '{}'", self.config.data_set_pattern),
            ));
        }
        info!("Pipeline '{}': {} data sets", self.config.name, ids.len());

        Ok(ids
            .into_iter()
            .map(|id| {
                let result = self.load_and_execute(&compiled, provider, &id);
                if let Err(err) = &result {
                    warn!("Data set '{}' failed: {}", id, err);
                }
                DataSetOutcome { data_set: id, result }
            })
            .collect())
    }

    /// Run a single data set.
    pub fn run_data_set<P>(&self, provider: &P, id: &str) -> Result<PipelineOutput>
    where
        P: DataSetProvider + ?Sized,
    {
        let compiled = self.config.compile()?;
        self.load_and_execute(&compiled, provider, id)
    }

    /// Pair and compute ratios for an already loaded collection.
    pub fn run_collection(&self, source: &SampleCollection) -> Result<PipelineOutput> {
        let compiled = self.config.compile()?;
        self.execute(&compiled, source, "<collection>", Vec::new())
    }

    fn load_and_execute<P>(&self, compiled: &CompiledConfig, provider: &P, id: &str) -> Result<PipelineOutput>
    where
        P: DataSetProvider + ?Sized,
    {
        let report = provider.load(id, &compiled.filter, &compiled.parser)?;
        if report.collection.is_empty() {
            return Err(CnError::empty(
                "load",
                format!("data set '{}' has no usable samples", id),
            ));
        }
        let rejected = report.rejected.iter().map(ToString::to_string).collect();
        self.execute(compiled, &report.collection, id, rejected)
    }

    fn execute(
        &self,
        compiled: &CompiledConfig,
        source: &SampleCollection,
        data_set: &str,
        rejected: Vec<String>,
    ) -> Result<PipelineOutput> {
        let paired = compiled.pairing.pair(source, &self.selection)?;
        let ratios = compiled.ratio.compute_paired(&paired)?;
        let display_names = ratios.display_names(&compiled.rules.pair_display);

        Ok(PipelineOutput {
            data_set: data_set.to_string(),
            pairing: paired.report,
            ratios,
            rejected,
            display_names,
        })
    }
}
