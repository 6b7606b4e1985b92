//! Analysis runner for composing and executing resampling phases.

use crate::aggregate::{aggregate_by_group, AggregateConfig, DEFAULT_INVALID_GROUPS};
use crate::bootstrap::{bootstrap_bray_curtis, BootstrapConfig, BootstrapResult};
use crate::data::{AbundanceMatrix, AbundanceTable};
use crate::error::{BetaError, Result};
use crate::test::{test_sorensen_permutation, PermutationConfig, PermutationResults};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Name of the bootstrap phase in logs and errors.
pub const BOOTSTRAP_PHASE: &str = "bootstrap";
/// Name of the permutation phase in logs and errors.
pub const PERMUTATION_PHASE: &str = "permutation";

fn default_invalid_groups() -> Vec<String> {
    DEFAULT_INVALID_GROUPS.iter().map(|s| s.to_string()).collect()
}

/// Analysis configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the analysis.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Column holding the grouping key (e.g. "Order").
    pub group_column: String,
    /// Sample columns, in output order.
    pub sample_columns: Vec<String>,
    /// Grouping keys treated as invalid.
    #[serde(default = "default_invalid_groups")]
    pub invalid_groups: Vec<String>,
    /// Bootstrap phase, if enabled.
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
    /// Permutation phase, if enabled.
    #[serde(default)]
    pub permutation: Option<PermutationConfig>,
}

impl AnalysisConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(BetaError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(BetaError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(BetaError::from)
    }

    /// Save to pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(BetaError::from)
    }

    /// Load from a file; `.json` is read as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// A complete configuration with both phases enabled.
    pub fn example() -> Self {
        Self {
            name: "order-level-beta-diversity".to_string(),
            description: Some("Bray-Curtis bootstrap and Sørensen permutation over taxonomic orders".to_string()),
            group_column: "Order".to_string(),
            sample_columns: ["M24", "M25", "M26", "M27"].iter().map(|s| s.to_string()).collect(),
            invalid_groups: default_invalid_groups(),
            bootstrap: Some(BootstrapConfig::default()),
            permutation: Some(PermutationConfig::default()),
        }
    }
}

/// Builder for constructing and running an analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    name: String,
    group_column: String,
    sample_columns: Vec<String>,
    invalid_groups: Vec<String>,
    bootstrap: Option<BootstrapConfig>,
    permutation: Option<PermutationConfig>,
}

impl Analysis {
    /// Create an analysis over `sample_columns` grouped by `group_column`, with no phases.
    pub fn new(group_column: &str, sample_columns: &[&str]) -> Self {
        Self {
            name: "unnamed".to_string(),
            group_column: group_column.to_string(),
            sample_columns: sample_columns.iter().map(|s| s.to_string()).collect(),
            invalid_groups: default_invalid_groups(),
            bootstrap: None,
            permutation: None,
        }
    }

    /// Create from a config.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            name: config.name.clone(),
            group_column: config.group_column.clone(),
            sample_columns: config.sample_columns.clone(),
            invalid_groups: config.invalid_groups.clone(),
            bootstrap: config.bootstrap.clone(),
            permutation: config.permutation.clone(),
        }
    }

    /// Set the analysis name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Replace the list of invalid grouping keys.
    pub fn invalid_groups(mut self, groups: &[&str]) -> Self {
        self.invalid_groups = groups.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Enable the Bray-Curtis bootstrap phase.
    pub fn bootstrap(mut self, config: BootstrapConfig) -> Self {
        self.bootstrap = Some(config);
        self
    }

    /// Enable the Sørensen permutation phase.
    pub fn permutation(mut self, config: PermutationConfig) -> Self {
        self.permutation = Some(config);
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            group_column: self.group_column.clone(),
            sample_columns: self.sample_columns.clone(),
            invalid_groups: self.invalid_groups.clone(),
            bootstrap: self.bootstrap.clone(),
            permutation: self.permutation.clone(),
        }
    }

    fn aggregate_config(&self, exclude_invalid: bool) -> AggregateConfig {
        AggregateConfig {
            group_column: self.group_column.clone(),
            sample_columns: self.sample_columns.clone(),
            exclude_invalid,
            invalid_groups: self.invalid_groups.clone(),
        }
    }

    /// Aggregate `table` the way a phase with `exclude_invalid` sees it.
    pub fn aggregate(&self, table: &AbundanceTable, exclude_invalid: bool) -> Result<AbundanceMatrix> {
        aggregate_by_group(table, &self.aggregate_config(exclude_invalid))
    }

    /// Run every configured phase on `table`.
    ///
    /// Configurations are validated before any phase runs.
    pub fn run(&self, table: &AbundanceTable) -> Result<AnalysisOutput> {
        if self.bootstrap.is_none() && self.permutation.is_none() {
            return Err(BetaError::Analysis(
                "Analysis must enable at least one phase".to_string(),
            ));
        }
        if let Some(config) = &self.bootstrap {
            config.validate().map_err(|e| e.in_phase(BOOTSTRAP_PHASE))?;
        }
        if let Some(config) = &self.permutation {
            config.validate().map_err(|e| e.in_phase(PERMUTATION_PHASE))?;
        }

        log::info!("Running analysis '{}' on {} table rows", self.name, table.n_rows());

        let bootstrap = match &self.bootstrap {
            Some(config) => Some(
                self.run_bootstrap(table, config)
                    .map_err(|e| e.in_phase(BOOTSTRAP_PHASE))?,
            ),
            None => None,
        };
        let permutation = match &self.permutation {
            Some(config) => Some(
                self.run_permutation(table, config)
                    .map_err(|e| e.in_phase(PERMUTATION_PHASE))?,
            ),
            None => None,
        };

        Ok(AnalysisOutput {
            name: self.name.clone(),
            bootstrap,
            permutation,
        })
    }

    fn run_bootstrap(&self, table: &AbundanceTable, config: &BootstrapConfig) -> Result<BootstrapResult> {
        let matrix = self.aggregate(table, config.exclude_invalid_groups)?;
        bootstrap_bray_curtis(&matrix, config)
    }

    fn run_permutation(&self, table: &AbundanceTable, config: &PermutationConfig) -> Result<PermutationResults> {
        let matrix = self.aggregate(table, config.exclude_invalid_groups)?;
        test_sorensen_permutation(&matrix, config)
    }
}

/// Results of every phase that ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Analysis name.
    pub name: String,
    /// Bray-Curtis bootstrap estimates.
    pub bootstrap: Option<BootstrapResult>,
    /// Sørensen permutation results.
    pub permutation: Option<PermutationResults>,
}

impl AnalysisOutput {
    /// Write every available matrix into `dir`, creating it if needed.
    pub fn write_csv<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        if let Some(bootstrap) = &self.bootstrap {
            bootstrap.write_csv(dir)?;
        }
        if let Some(permutation) = &self.permutation {
            permutation.write_csv(dir)?;
        }
        log::info!("Wrote matrices to {}", dir.display());
        Ok(())
    }
}

impl fmt::Display for AnalysisOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis: {}", self.name)?;
        if let Some(b) = &self.bootstrap {
            let (Ok(mean), Ok(lower), Ok(upper)) = (b.mean_matrix(), b.lower_matrix(), b.upper_matrix()) else {
                return Err(fmt::Error);
            };
            writeln!(f, "\nBray-Curtis bootstrap mean ({} replicates):", b.config.n_bootstrap)?;
            write!(f, "{}", mean)?;
            writeln!(f, "\nLower bound ({:.1}%):", b.config.confidence * 100.0)?;
            write!(f, "{}", lower)?;
            writeln!(f, "\nUpper bound ({:.1}%):", b.config.confidence * 100.0)?;
            write!(f, "{}", upper)?;
        }
        if let Some(p) = &self.permutation {
            let (Ok(sim), Ok(pv), Ok(dis)) = (p.similarity_matrix(), p.p_value_matrix(), p.dissimilarity_matrix()) else {
                return Err(fmt::Error);
            };
            writeln!(f, "\nSørensen similarity:")?;
            write!(f, "{}", sim)?;
            writeln!(f, "\nPermutation p-values ({} permutations):", p.config.n_permutations)?;
            write!(f, "{}", pv)?;
            writeln!(f, "\nSørensen dissimilarity:")?;
            write!(f, "{}", dis)?;
        }
        Ok(())
    }
}
