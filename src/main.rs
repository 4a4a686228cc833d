//! Remus: regulatory region-set composition
//!
//! Usage: remus [--data-dir <DIR> | --config <FILE>] <COMMAND> [OPTIONS]

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::error;

use remus::compose::{
    compose, matching_genes, matching_tissues, CompositionResult, ParameterBundle,
    TRANSCRIPTION_RANGE_PLACEHOLDER,
};
use remus::config::RemusConfig;
use remus::logging::init_tracing;
use remus::registry::{GeneSource, Registries};
use remus::session::ResultStore;
use remus::{RemusError, Result};

/// Message shown for any failed composition request.
const REQUEST_FAILED: &str = "Error occurred";

#[derive(Parser)]
#[command(name = "remus")]
#[command(version)]
#[command(about = "Remus: compose regulatory region sets for genes, tissues and genome assemblies", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// TOML configuration file
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Data directory with the genes/, tissues/, tss/ and genomes/ layout
    #[arg(long, short = 'd', global = true, conflicts_with = "config")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a region set from genes, tissues and region categories
    Compose(ComposeArgs),

    /// Run every [[request]] of a TOML file as an independent request
    Batch {
        /// Request file
        file: PathBuf,
    },

    /// List gene symbols starting with a pattern
    Genes {
        /// Genome assembly (hg19/hg37 are aliases)
        #[arg(short, long)]
        genome: String,

        /// Symbol prefix (case-insensitive)
        #[arg(short, long)]
        pattern: String,

        /// Maximum number of symbols (0 = all)
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List tissues whose name contains a pattern
    Tissues {
        /// Substring to look for (case-insensitive); empty lists all
        #[arg(short, long, default_value = "")]
        pattern: String,

        /// Maximum number of tissues (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// List assemblies with gene data
    Genomes,
}

/// Request fields. Flag names match the request parameter names.
#[derive(Args, Debug, Default)]
struct ComposeArgs {
    /// Gene symbols (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    genes: Vec<String>,

    /// Tissue identifiers (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    tissues: Vec<String>,

    /// Genome assembly
    #[arg(long)]
    genome: Option<String>,

    /// Include promoters near the genes
    #[arg(long)]
    transcription_fantom5_used: bool,
    /// Kilobases upstream of the genes
    #[arg(long, value_name = "KB")]
    transcription_fantom5_kbs_upstream: Option<String>,
    /// Kilobases downstream of the genes
    #[arg(long, value_name = "KB")]
    transcription_fantom5_kbs_downstream: Option<String>,

    /// Include FANTOM5 enhancers near the genes
    #[arg(long)]
    enhancers_fantom5_used: bool,
    /// How tissue catalogs are combined: all or any
    #[arg(long, value_name = "MODE")]
    enhancers_fantom5_range: Option<String>,
    #[arg(long, value_name = "KB")]
    enhancers_fantom5_kbs_upstream: Option<String>,
    #[arg(long, value_name = "KB")]
    enhancers_fantom5_kbs_downstream: Option<String>,

    /// Include ENCODE enhancers near the genes
    #[arg(long)]
    enhancers_encode_used: bool,
    #[arg(long, value_name = "MODE")]
    enhancers_encode_range: Option<String>,
    #[arg(long, value_name = "KB")]
    enhancers_encode_kbs_upstream: Option<String>,
    #[arg(long, value_name = "KB")]
    enhancers_encode_kbs_downstream: Option<String>,

    /// Include accessible chromatin near the genes
    #[arg(long)]
    accessible_chromatin_encode_used: bool,
    #[arg(long, value_name = "MODE")]
    accessible_chromatin_encode_range: Option<String>,
    #[arg(long, value_name = "KB")]
    accessible_chromatin_encode_kbs_upstream: Option<String>,
    #[arg(long, value_name = "KB")]
    accessible_chromatin_encode_kbs_downstream: Option<String>,

    /// Write the result here instead of a temporary file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ComposeArgs {
    fn to_bundle(&self) -> ParameterBundle {
        let mut bundle = ParameterBundle::new();

        if !self.genes.is_empty() {
            bundle.insert("genes", self.genes.clone());
        }
        if !self.tissues.is_empty() {
            bundle.insert("tissues", self.tissues.clone());
        }

        let texts = [
            ("genome", &self.genome),
            ("transcription-fantom5-kbs-upstream", &self.transcription_fantom5_kbs_upstream),
            ("transcription-fantom5-kbs-downstream", &self.transcription_fantom5_kbs_downstream),
            ("enhancers-fantom5-range", &self.enhancers_fantom5_range),
            ("enhancers-fantom5-kbs-upstream", &self.enhancers_fantom5_kbs_upstream),
            ("enhancers-fantom5-kbs-downstream", &self.enhancers_fantom5_kbs_downstream),
            ("enhancers-encode-range", &self.enhancers_encode_range),
            ("enhancers-encode-kbs-upstream", &self.enhancers_encode_kbs_upstream),
            ("enhancers-encode-kbs-downstream", &self.enhancers_encode_kbs_downstream),
            ("accessible-chromatin-encode-range", &self.accessible_chromatin_encode_range),
            (
                "accessible-chromatin-encode-kbs-upstream",
                &self.accessible_chromatin_encode_kbs_upstream,
            ),
            (
                "accessible-chromatin-encode-kbs-downstream",
                &self.accessible_chromatin_encode_kbs_downstream,
            ),
        ];
        for (name, value) in texts {
            if let Some(value) = value {
                bundle.insert(name, value.as_str());
            }
        }

        for (name, enabled) in [
            ("transcription-fantom5-used", self.transcription_fantom5_used),
            ("enhancers-fantom5-used", self.enhancers_fantom5_used),
            ("enhancers-encode-used", self.enhancers_encode_used),
            ("accessible-chromatin-encode-used", self.accessible_chromatin_encode_used),
        ] {
            bundle.set_flag(name, enabled);
        }

        bundle
    }
}

/// Shape of a `batch` request file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchFile {
    #[serde(rename = "request", default)]
    requests: Vec<ParameterBundle>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.data_dir.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_filter());

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let result = match cli.command {
        Commands::Compose(args) => run_compose(&config, &args),
        Commands::Batch { file } => run_batch(&config, &file),
        Commands::Genes {
            genome,
            pattern,
            limit,
        } => run_genes(&config, &genome, &pattern, limit),
        Commands::Tissues { pattern, limit } => run_tissues(&config, &pattern, limit),
        Commands::Genomes => run_genomes(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(config: Option<&Path>, data_dir: Option<&Path>) -> Result<RemusConfig> {
    match (config, data_dir) {
        (Some(path), _) => RemusConfig::try_from(path),
        (None, Some(dir)) => Ok(RemusConfig::from_data_dir(dir)),
        (None, None) => Ok(RemusConfig::default()),
    }
}

/// The promoter category lists a range parameter it never uses; the
/// request boundary always fills it.
fn prepare_request(mut bundle: ParameterBundle) -> ParameterBundle {
    bundle.insert(
        "transcription-fantom5-range",
        TRANSCRIPTION_RANGE_PLACEHOLDER,
    );
    bundle
}

/// Run one request against freshly opened registries and persist the result.
fn run_request(
    config: &RemusConfig,
    store: &ResultStore,
    bundle: &ParameterBundle,
    output: Option<&Path>,
) -> Result<(CompositionResult, PathBuf)> {
    let genes = config.genes_registry();
    let tissues = config.tissues_registry();
    let tss = config.tss_registry();
    let engine = config.engine();

    let composition = compose(bundle, Registries::new(&genes, &tissues, &tss), &engine)?;

    let path = match output {
        Some(path) => {
            composition.result.save_as(path)?;
            path.to_path_buf()
        }
        None => store.save(&store.new_token(), &composition.result)?,
    };
    Ok((composition, path))
}

/// Print the outcome of one request. Failures are logged and reported
/// with a fixed message.
fn report(outcome: Result<(CompositionResult, PathBuf)>) -> bool {
    match outcome {
        Ok((composition, path)) => {
            print!("{}", composition);
            println!("Result: {}", path.display());
            true
        }
        Err(e) => {
            error!(error = %e, "composition request failed");
            println!("{}", REQUEST_FAILED);
            false
        }
    }
}

fn run_compose(config: &RemusConfig, args: &ComposeArgs) -> Result<ExitCode> {
    config.validate()?;
    let store = ResultStore::new(config.results_dir.clone());
    let bundle = prepare_request(args.to_bundle());

    let outcome = run_request(config, &store, &bundle, args.output.as_deref());
    Ok(if report(outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_batch(config: &RemusConfig, file: &Path) -> Result<ExitCode> {
    config.validate()?;
    let text = read_to_string(file)?;
    let batch: BatchFile = toml::from_str(&text)
        .map_err(|e| RemusError::Config(format!("{}: {}", file.display(), e)))?;
    let store = ResultStore::new(config.results_dir.clone());

    let mut failed = 0;
    for (i, bundle) in batch.requests.into_iter().enumerate() {
        println!("Request {}:", i + 1);
        let bundle = prepare_request(bundle);
        if !report(run_request(config, &store, &bundle, None)) {
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("{} request(s) failed", failed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_genes(config: &RemusConfig, genome: &str, pattern: &str, limit: usize) -> Result<ExitCode> {
    let genes = config.genes_registry();
    for symbol in matching_genes(&genes, pattern, genome, limit)? {
        println!("{}", symbol);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_tissues(config: &RemusConfig, pattern: &str, limit: usize) -> Result<ExitCode> {
    let tissues = config.tissues_registry();
    for tissue in matching_tissues(&tissues, pattern, limit)? {
        println!("{}", tissue);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_genomes(config: &RemusConfig) -> Result<ExitCode> {
    for genome in config.genes_registry().available_genomes()? {
        println!("{}", genome);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remus::compose::ParamValue;

    #[test]
    fn test_compose_args_to_bundle() {
        let cli = Cli::parse_from([
            "remus",
            "compose",
            "--genes",
            "BRCA1,TP53",
            "--genome",
            "hg19",
            "--enhancers-fantom5-used",
            "--enhancers-fantom5-range",
            "any",
            "--enhancers-fantom5-kbs-upstream",
            "0",
        ]);
        let Commands::Compose(args) = cli.command else {
            panic!("expected compose");
        };

        let bundle = prepare_request(args.to_bundle());

        assert_eq!(
            bundle.get("genes"),
            Some(&ParamValue::from(vec!["BRCA1", "TP53"]))
        );
        assert_eq!(bundle.get("enhancers-fantom5-used"), Some(&ParamValue::from("on")));
        assert_eq!(
            bundle.get("enhancers-fantom5-kbs-upstream"),
            Some(&ParamValue::from("0"))
        );
        assert!(bundle.get("enhancers-encode-used").is_none());
        assert!(bundle.get("tissues").is_none());
        assert_eq!(
            bundle.get("transcription-fantom5-range"),
            Some(&ParamValue::from(TRANSCRIPTION_RANGE_PLACEHOLDER))
        );
    }

    #[test]
    fn test_batch_file_shape() {
        let batch: BatchFile = toml::from_str(
            r#"
            [[request]]
            genes = ["BRCA1"]
            genome = "hg19"

            [[request]]
            genome = "mm10"
            "#,
        )
        .unwrap();

        assert_eq!(batch.requests.len(), 2);
        assert!(batch.requests[1].get("genes").is_none());
    }
}
