//! pgguard - analyze PostgreSQL EXPLAIN plans and gate slow queries
//!
//! Usage:
//!   pgguard analyze --query <SQL> --plan <explain.json> [--max-cost <cost>]
//!   pgguard analyze --file <query.sql> --plan <explain.json> --output json
//!   pgguard services
//!
//! Exit status is 0 when the query passes the gate, 1 when it does not and
//! 2 when analysis could not run.

mod config;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Config, OutputFormat};
use pgguard_analyzer::{FilePlanSource, PlanSource, QueryAnalyzer};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pgguard")]
#[command(about = "Analyze PostgreSQL EXPLAIN plans and flag slow queries")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config dir>/pgguard/config.toml)
    #[arg(long, global = true, env = "PGGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging, and print the plan outline when analyzing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one query against its EXPLAIN (FORMAT JSON) output
    Analyze(AnalyzeArgs),

    /// List the managed services recommendations can refer to
    Services,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Query text
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    query: Option<String>,

    /// File containing the query text
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// EXPLAIN (FORMAT JSON) output for the query
    #[arg(short, long)]
    plan: PathBuf,

    /// Total cost above which the query fails the gate
    #[arg(long)]
    max_cost: Option<f64>,

    /// Environment tag stamped on the report
    #[arg(long = "env", env = "PGGUARD_ENV")]
    environment: Option<String>,

    /// Output format
    #[arg(short, long)]
    output: Option<OutputFormat>,
}

/// Effective analyze settings after merging flags over the config file
#[derive(Debug, Clone, PartialEq)]
struct AnalyzeSettings {
    max_cost: f64,
    environment: Option<String>,
    format: OutputFormat,
}

impl AnalyzeSettings {
    fn resolve(args: &AnalyzeArgs, config: &Config) -> Self {
        Self {
            max_cost: args.max_cost.unwrap_or(config.analysis.max_cost),
            environment: args
                .environment
                .clone()
                .or_else(|| config.analysis.environment.clone()),
            format: args.output.unwrap_or(config.output.format),
        }
    }
}

async fn read_query(args: &AnalyzeArgs) -> Result<String> {
    match (&args.query, &args.file) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(path)) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read query file: {:?}", path))?;
            Ok(text.trim().to_string())
        }
        (None, None) => anyhow::bail!("either --query or --file is required"),
    }
}

/// Runs an analysis and reports whether the query passed the gate
async fn analyze(args: AnalyzeArgs, config: &Config, verbose: bool) -> Result<bool> {
    let settings = AnalyzeSettings::resolve(&args, config);
    let query = read_query(&args).await?;

    let source = FilePlanSource::new(&args.plan);
    tracing::debug!(source = %source.describe(), "Fetching plan");
    let plan = source
        .fetch_plan(&query)
        .await
        .with_context(|| format!("Failed to load plan from {:?}", args.plan))?;

    if verbose {
        eprintln!("{}", render::render_plan_outline(&plan));
    }

    let analyzer = match &settings.environment {
        Some(env) => QueryAnalyzer::new().with_environment(env),
        None => QueryAnalyzer::new(),
    };
    let report = analyzer.analyze(&query, &plan).context("Analysis failed")?;

    match settings.format {
        OutputFormat::Text => println!("{}", render::render_text(&report, settings.max_cost)),
        OutputFormat::Json => println!("{}", render::render_json(&report)?),
    }

    let passed = report.passes_gate(settings.max_cost);
    tracing::info!(
        score = report.score,
        critical = report.is_critical,
        max_cost = settings.max_cost,
        passed,
        "Gate evaluated"
    );
    Ok(passed)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let _log_guard = match logging::init(&config.logging, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Analyze(args) => match analyze(args, &config, cli.verbose).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Analysis aborted");
                eprintln!("Error: {:#}", e);
                ExitCode::from(2)
            }
        },
        Commands::Services => {
            println!("{}", render::render_services());
            ExitCode::SUCCESS
        }
    }
}
