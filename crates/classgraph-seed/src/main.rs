//! CLI entry point for the classroom graph seeder.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use classgraph_core::settings::DEFAULT_FILE_PREFIX;
use classgraph_core::Settings;
use classgraph_graph::GatewayConfig;

use classgraph_seed::plan::SeedPlan;
use classgraph_seed::runner::{connect_and_run, RunOptions};

#[derive(Parser)]
#[command(name = "classgraph-seed")]
#[command(about = "Load the classroom layout graph into Neo4j from remote CSV files")]
struct Cli {
    /// Config file prefix (default: classgraph).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
    config: String,

    /// Override the target database (otherwise seed.database from config).
    #[arg(short, long)]
    database: Option<String>,

    /// Override the CSV base URL.
    #[arg(long)]
    csv_base_url: Option<String>,

    /// Run only these steps (repeatable). Default: all.
    #[arg(short, long = "step")]
    steps: Vec<String>,

    /// Stop at the first failing step.
    #[arg(long)]
    strict: bool,

    /// Print the Cypher for each step without connecting.
    #[arg(long)]
    dry_run: bool,

    /// List step names and exit.
    #[arg(long)]
    list: bool,

    /// Print the run report (or, with --dry-run, the plan) as JSON on stdout.
    #[arg(long)]
    report_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the report; logs go to stderr.
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let database = cli.database.as_deref().unwrap_or(&settings.seed.database);
    let base_url = cli
        .csv_base_url
        .as_deref()
        .unwrap_or(&settings.seed.csv_base_url);
    let plan = SeedPlan::classroom(base_url, database).select(&cli.steps)?;

    if cli.list {
        for step in &plan.steps {
            println!("{}\t{:?}", step.name, step.kind);
        }
        return Ok(());
    }

    if cli.dry_run {
        tracing::info!(database = %plan.database, steps = plan.len(), "Dry run, not connecting");
        if cli.report_json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            return Ok(());
        }
        for step in &plan.steps {
            println!("// {} (database: {})\n{};\n", step.name, plan.database, step.cypher);
        }
        return Ok(());
    }

    let mut options = RunOptions::from(&settings);
    options.strict |= cli.strict;

    let gateway_config = GatewayConfig::from(&settings.neo4j);
    let report = connect_and_run(&gateway_config, &plan, options).await?;

    if cli.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    report.ensure_success()?;
    Ok(())
}
