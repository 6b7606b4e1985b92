//! beta - resampling-based beta diversity CLI
//!
//! Command-line interface for bootstrap Bray-Curtis intervals and Sørensen
//! permutation tests over grouped abundance tables.

use clap::{Args, Parser, Subcommand, ValueEnum};
use composable_beta::bootstrap::BootstrapConfig;
use composable_beta::data::AbundanceTable;
use composable_beta::error::Result;
use composable_beta::pipeline::{Analysis, AnalysisConfig};
use composable_beta::profile::profile_matrix;
use composable_beta::test::PermutationConfig;
use std::path::{Path, PathBuf};

/// Output format for profiles.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Resampling-based beta diversity
#[derive(Parser)]
#[command(name = "beta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input table and the columns to aggregate.
#[derive(Args)]
struct InputArgs {
    /// Path to the abundance table CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Column holding the grouping key
    #[arg(short, long, default_value = "Order")]
    group: String,

    /// Sample columns (comma-separated, e.g. "M24,M25,M26")
    #[arg(short, long, value_delimiter = ',', required = true)]
    samples: Vec<String>,
}

impl InputArgs {
    fn analysis(&self) -> Analysis {
        let samples: Vec<&str> = self.samples.iter().map(|s| s.trim()).collect();
        Analysis::new(&self.group, &samples)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate Bray-Curtis dissimilarity with bootstrap confidence intervals
    Bootstrap {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory for CSV matrices
        #[arg(short, long)]
        output: PathBuf,

        /// Number of bootstrap replicates (default: 1000)
        #[arg(long, default_value = "1000")]
        n_bootstrap: usize,

        /// Columns drawn per replicate (default: number of groups)
        #[arg(long)]
        sample_size: Option<usize>,

        /// Confidence level (default: 0.95)
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Random seed (default: 42)
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Run replicates on a single thread
        #[arg(long)]
        serial: bool,

        /// Drop unclassified/unknown groups before resampling
        #[arg(long)]
        exclude_invalid: bool,
    },

    /// Test Sørensen similarity of every sample pair by permutation
    Permutation {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory for CSV matrices
        #[arg(short, long)]
        output: PathBuf,

        /// Number of permutations per pair (default: 1000)
        #[arg(long, default_value = "1000")]
        n_permutations: usize,

        /// Random seed (default: 42)
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Test pairs on a single thread
        #[arg(long)]
        serial: bool,

        /// Keep unclassified/unknown groups
        #[arg(long)]
        keep_invalid: bool,
    },

    /// Run an analysis from a YAML or JSON configuration file
    Run {
        /// Path to analysis configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the abundance table CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for CSV matrices
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Profile the aggregated abundance matrix
    Profile {
        #[command(flatten)]
        input: InputArgs,

        /// Drop unclassified/unknown groups
        #[arg(long)]
        exclude_invalid: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate an example analysis configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "analysis.yaml")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bootstrap {
            input,
            output,
            n_bootstrap,
            sample_size,
            confidence,
            seed,
            serial,
            exclude_invalid,
        } => {
            let config = BootstrapConfig {
                n_bootstrap,
                sample_size,
                confidence,
                seed,
                parallel: !serial,
                exclude_invalid_groups: exclude_invalid,
            };
            cmd_analyze(&input.input, input.analysis().name("bootstrap").bootstrap(config), &output)
        }

        Commands::Permutation {
            input,
            output,
            n_permutations,
            seed,
            serial,
            keep_invalid,
        } => {
            let config = PermutationConfig {
                n_permutations,
                seed,
                parallel: !serial,
                exclude_invalid_groups: !keep_invalid,
            };
            cmd_analyze(&input.input, input.analysis().name("permutation").permutation(config), &output)
        }

        Commands::Run { config, input, output } => cmd_run(&config, &input, &output),

        Commands::Profile {
            input,
            exclude_invalid,
            format,
        } => cmd_profile(&input, exclude_invalid, format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_table(input_path: &Path) -> Result<AbundanceTable> {
    log::info!("Loading abundance table from {:?}...", input_path);
    let table = AbundanceTable::from_csv(input_path)?;
    log::info!("Loaded {} rows x {} columns", table.n_rows(), table.column_names().len());
    Ok(table)
}

fn cmd_analyze(input_path: &Path, analysis: Analysis, output_path: &Path) -> Result<()> {
    let table = load_table(input_path)?;
    let output = analysis.run(&table)?;
    output.write_csv(output_path)?;
    println!("{}", output);
    Ok(())
}

fn cmd_run(config_path: &Path, input_path: &Path, output_path: &Path) -> Result<()> {
    log::info!("Loading analysis configuration from {:?}...", config_path);
    let config = AnalysisConfig::from_file(config_path)?;
    cmd_analyze(input_path, Analysis::from_config(&config), output_path)
}

fn cmd_profile(input: &InputArgs, exclude_invalid: bool, format: OutputFormat) -> Result<()> {
    let table = load_table(&input.input)?;
    let matrix = input.analysis().aggregate(&table, exclude_invalid)?;
    let profile = profile_matrix(&matrix);

    match format {
        OutputFormat::Json => println!("{}", profile.to_json()?),
        OutputFormat::Text => print!("{}", profile),
    }
    Ok(())
}

fn cmd_example(output_path: &Path) -> Result<()> {
    let yaml = AnalysisConfig::example().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example analysis to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
