//! Command-line front end for the gateway analysis pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Full analysis: report.json, candidates.json, registrars.csv, result_set.json
//! gateway-analysis analyze data/registrars.csv
//!
//! # Only list shared endpoints no provider claims
//! gateway-analysis candidates data/registrars.csv --min-registrars 3
//!
//! # Rename / remove categories in a stored result set
//! gateway-analysis reconcile -d "InternetX=>RRPProxy/CentralNic" -d "-Gransy" --yes
//!
//! # Attach registrar contact data
//! gateway-analysis enrich --directory directory.json
//!
//! # Show the catalog and overlapping patterns
//! gateway-analysis catalog
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rdap_gateway_analysis::application::services::{
    AnalysisOutcome, AnalysisService, CandidateDetector, Directive, EnrichmentService, ResultSet,
    authority_usage,
};
use rdap_gateway_analysis::config::Config;
use rdap_gateway_analysis::domain::entities::{
    CandidateGateway, EnrichedRegistrar, MarketReport, PatternCatalog, RegistrarRecord,
};
use rdap_gateway_analysis::domain::repositories::RegistrarDirectory;
use rdap_gateway_analysis::infrastructure::directory::{JsonFileDirectory, NullDirectory};
use rdap_gateway_analysis::infrastructure::export::{
    AnalysisDocument, export_records_csv, read_snapshot, write_json,
};
use rdap_gateway_analysis::infrastructure::input::CsvTableLoader;

const REPORT_FILE: &str = "report.json";
const CANDIDATES_FILE: &str = "candidates.json";
const RECORDS_FILE: &str = "registrars.csv";
const RESULT_SET_FILE: &str = "result_set.json";
const ENRICHMENT_FILE: &str = "enrichment.json";

#[derive(Parser)]
#[command(name = "gateway-analysis")]
#[command(author, version, about = "RDAP gateway provider classification", long_about = None)]
struct Cli {
    /// Output directory (overrides GATEWAY_OUTPUT_DIR)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pattern catalog JSON file (overrides GATEWAY_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify registrars and write the full report set
    Analyze {
        /// Registrar table (overrides GATEWAY_INPUT)
        input: Option<PathBuf>,

        /// Minimum registrars sharing an endpoint to report it as a candidate
        #[arg(long)]
        min_registrars: Option<usize>,

        /// Registrars listed per category
        #[arg(long)]
        top: Option<usize>,
    },
    /// List unclaimed RDAP endpoints shared by several registrars
    Candidates {
        /// Registrar table (overrides GATEWAY_INPUT)
        input: Option<PathBuf>,

        #[arg(long)]
        min_registrars: Option<usize>,
    },
    /// Apply rename / removal directives to a stored result set
    Reconcile {
        /// Directive: `FROM=>TO` renames a category, `-NAME` removes one
        #[arg(short, long = "directive", required = true)]
        directives: Vec<Directive>,

        /// Result set to start from (default: <output>/result_set.json)
        #[arg(long)]
        from: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Attach registrar contact data from a directory file
    Enrich {
        /// Directory JSON file (overrides REGISTRAR_DIRECTORY)
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Result set to enrich (default: <output>/result_set.json)
        #[arg(long)]
        from: Option<PathBuf>,

        /// Include self-hosted registrars, not only gateway customers
        #[arg(long)]
        all: bool,
    },
    /// Show the pattern catalog and overlapping patterns
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }

    match &cli.command {
        Commands::Analyze {
            input,
            min_registrars,
            top,
        } => {
            apply_input_overrides(&mut config, input, *min_registrars);
            if let Some(top) = top {
                config.top_n = *top;
            }
        }
        Commands::Candidates {
            input,
            min_registrars,
        } => apply_input_overrides(&mut config, input, *min_registrars),
        Commands::Enrich { directory, .. } => {
            if let Some(directory) = directory {
                config.registrar_directory = Some(directory.clone());
            }
        }
        Commands::Reconcile { .. } | Commands::Catalog => {}
    }

    config.validate().context("Invalid configuration")?;
    init_tracing(&config);
    config.print_summary();

    match cli.command {
        Commands::Analyze { .. } => analyze(&config)?,
        Commands::Candidates { .. } => candidates(&config)?,
        Commands::Reconcile {
            directives,
            from,
            yes,
        } => reconcile(&config, directives, from, yes)?,
        Commands::Enrich { from, all, .. } => enrich(&config, from, all).await?,
        Commands::Catalog => show_catalog(&config)?,
    }

    Ok(())
}

fn apply_input_overrides(
    config: &mut Config,
    input: &Option<PathBuf>,
    min_registrars: Option<usize>,
) {
    if let Some(input) = input {
        config.input_path = Some(input.clone());
    }
    if let Some(min) = min_registrars {
        config.candidate_min_registrars = min;
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_analysis(config: &Config) -> Result<AnalysisOutcome> {
    let input = config
        .input_path
        .as_deref()
        .context("No input table: pass a path or set GATEWAY_INPUT")?;
    let catalog = config.load_catalog()?;
    let records = CsvTableLoader::load_path(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    Ok(AnalysisService::new(config.analysis_options()).run(catalog, records))
}

/// Runs the full pipeline and writes every output file.
fn analyze(config: &Config) -> Result<()> {
    println!("{}", "🔎 RDAP Gateway Analysis".bright_blue().bold());
    println!();

    let outcome = run_analysis(config)?;

    write_json(
        &AnalysisDocument::from_outcome(&outcome),
        &config.output_file(REPORT_FILE),
    )?;
    write_json(&outcome.candidates, &config.output_file(CANDIDATES_FILE))?;
    export_records_csv(
        outcome.result_set.records(),
        &config.output_file(RECORDS_FILE),
    )?;
    write_json(
        &outcome.result_set.snapshot(),
        &config.output_file(RESULT_SET_FILE),
    )?;

    println!(
        "  Classified: {}  Unclassified: {}  Missing URL: {}  Malformed URL: {}",
        outcome.classification.classified.to_string().green(),
        outcome.classification.unclassified.to_string().yellow(),
        outcome.classification.missing_url.to_string().bright_black(),
        outcome.classification.malformed_url.to_string().red(),
    );
    println!();
    print_report(outcome.result_set.report());
    print_candidates(&outcome.candidates);
    print_written(config, &[REPORT_FILE, CANDIDATES_FILE, RECORDS_FILE, RESULT_SET_FILE]);

    Ok(())
}

fn candidates(config: &Config) -> Result<()> {
    let outcome = run_analysis(config)?;
    write_json(&outcome.candidates, &config.output_file(CANDIDATES_FILE))?;

    print_candidates(&outcome.candidates);
    print_written(config, &[CANDIDATES_FILE]);
    Ok(())
}

/// Applies directives to a stored result set after confirmation.
fn reconcile(
    config: &Config,
    directives: Vec<Directive>,
    from: Option<PathBuf>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔁 Reconcile categories".bright_blue().bold());
    println!();

    let source = from.unwrap_or_else(|| config.output_file(RESULT_SET_FILE));
    let snapshot = read_snapshot(&source)
        .with_context(|| format!("Failed to read result set {}", source.display()))?;

    let service = AnalysisService::new(config.analysis_options());
    let reconciler = service.reconciler();
    let current = reconciler.restore(snapshot);

    println!("{}", "Directives:".bright_white().bold());
    for directive in &directives {
        let state = if current.applied().contains(directive) {
            "already applied".bright_black()
        } else if current.has_category(directive.source()) {
            "pending".green()
        } else {
            "unknown category".red()
        };
        println!("  {:<40} {}", directive.to_string().cyan(), state);
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Apply these directives?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let updated = match reconciler.apply_all(&current, &directives) {
        Ok(set) => set,
        Err(e) => {
            tracing::error!(code = e.code(), details = %e.details(), "{e}");
            return Err(e).context("Failed to apply directives");
        }
    };

    write_reconciled(config, &service, &updated)?;

    println!("{}", "✅ Result set updated".green().bold());
    println!();
    print_report(updated.report());
    print_written(config, &[REPORT_FILE, CANDIDATES_FILE, RECORDS_FILE, RESULT_SET_FILE]);

    Ok(())
}

fn write_reconciled(config: &Config, service: &AnalysisService, set: &ResultSet) -> Result<()> {
    let options = service.options();
    let candidates = CandidateDetector::new(options.min_registrars).find_candidates(set.records());
    let usage = authority_usage(set.records(), Some(options.authority_limit));
    let overlaps = set.catalog().ambiguities();

    let document = AnalysisDocument {
        analyzed_at: Utc::now(),
        classification: None,
        report: set.report(),
        candidates: &candidates,
        top_rdap_authorities: &usage,
        catalog_overlaps: &overlaps,
        applied_directives: set.applied().iter().map(ToString::to_string).collect(),
    };

    write_json(&document, &config.output_file(REPORT_FILE))?;
    write_json(&candidates, &config.output_file(CANDIDATES_FILE))?;
    export_records_csv(set.records(), &config.output_file(RECORDS_FILE))?;
    write_json(&set.snapshot(), &config.output_file(RESULT_SET_FILE))?;
    Ok(())
}

async fn enrich(config: &Config, from: Option<PathBuf>, include_all: bool) -> Result<()> {
    println!("{}", "📇 Enrich registrars".bright_blue().bold());
    println!();

    let source = from.unwrap_or_else(|| config.output_file(RESULT_SET_FILE));
    let snapshot = read_snapshot(&source)
        .with_context(|| format!("Failed to read result set {}", source.display()))?;
    let records: Vec<RegistrarRecord> = snapshot
        .records
        .into_iter()
        .filter(|r| include_all || r.is_classified())
        .collect();

    let enriched = match &config.registrar_directory {
        Some(path) => {
            let directory = JsonFileDirectory::from_path(path)
                .await
                .with_context(|| format!("Failed to load directory {}", path.display()))?;
            run_enrichment(Arc::new(directory), config, &records).await
        }
        None => {
            println!(
                "{}",
                "⚠️  No registrar directory configured; writing records without contacts"
                    .yellow()
            );
            run_enrichment(Arc::new(NullDirectory::new()), config, &records).await
        }
    };

    let found = enriched.iter().filter(|e| e.is_enriched()).count();
    write_json(&enriched, &config.output_file(ENRICHMENT_FILE))?;

    println!(
        "  Enriched: {} / {}",
        found.to_string().bright_white().bold(),
        enriched.len()
    );
    print_written(config, &[ENRICHMENT_FILE]);
    Ok(())
}

async fn run_enrichment<D: RegistrarDirectory>(
    directory: Arc<D>,
    config: &Config,
    records: &[RegistrarRecord],
) -> Vec<EnrichedRegistrar> {
    EnrichmentService::new(directory, config.enrichment_retries)
        .enrich(records)
        .await
}

fn show_catalog(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;
    print_catalog(&catalog);
    Ok(())
}

fn print_catalog(catalog: &PatternCatalog) {
    println!(
        "{} {}",
        "📚 Pattern Catalog".bright_blue().bold(),
        format!("v{}", catalog.version()).bright_black()
    );
    println!();

    for provider in catalog.providers() {
        println!("  {}", provider.name.cyan().bold());
        for pattern in &provider.patterns {
            println!("    {}", pattern);
        }
    }

    let overlaps = catalog.ambiguities();
    println!();
    if overlaps.is_empty() {
        println!("{}", "  No overlapping patterns".green());
        return;
    }

    println!("{}", "⚠️  Overlapping patterns (catalog order decides):".yellow());
    for overlap in &overlaps {
        println!(
            "  {} ({}) is contained in {} ({})",
            overlap.pattern.cyan(),
            overlap.provider,
            overlap.contained_in_pattern.cyan(),
            overlap.contained_in_provider
        );
    }
}

fn print_report(report: &MarketReport) {
    println!(
        "  Registrars: {}  Domains: {}  RDAP URLs: {}",
        report.total_registrars.to_string().bright_white().bold(),
        report.total_domains.to_string().bright_white().bold(),
        report.unique_rdap_urls.to_string().bright_white().bold()
    );
    println!();

    println!(
        "  {:<24} {:>10} {:>14} {:>9}",
        "Provider".bright_white().bold(),
        "Registrars".bright_white().bold(),
        "Domains".bright_white().bold(),
        "Share".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for summary in report.ranked() {
        println!(
            "  {:<24} {:>10} {:>14} {:>8.2}%",
            summary.name.cyan(),
            summary.registrar_count,
            summary.total_domains,
            summary.market_share_percent
        );
    }

    println!("  {}", "─".repeat(60).bright_black());
    println!(
        "  {:<24} {:>10} {:>14} {:>8.2}%",
        "Gateway total".green(),
        report.gateway.registrars,
        report.gateway.domains,
        report.gateway.market_share_percent
    );
    println!(
        "  {:<24} {:>10} {:>14} {:>8.2}%",
        "Self-hosted".yellow(),
        report.self_hosted.registrars,
        report.self_hosted.domains,
        report.self_hosted.market_share_percent
    );
    println!();
}

fn print_candidates(candidates: &[CandidateGateway]) {
    if candidates.is_empty() {
        println!("{}", "  No candidate gateways found".green());
        println!();
        return;
    }

    println!("{}", "🧩 Candidate gateways".bright_blue().bold());
    for candidate in candidates {
        println!(
            "  {:<40} {:>4} registrars {:>12} domains  {}",
            candidate.authority.cyan(),
            candidate.registrar_count,
            candidate.total_domains,
            candidate.sample_registrars.join(", ").bright_black()
        );
    }
    println!();
}

fn print_written(config: &Config, files: &[&str]) {
    let paths: Vec<String> = files
        .iter()
        .map(|f| config.output_file(f).display().to_string())
        .collect();
    println!("  Wrote: {}", paths.join(", ").bright_black());
}
