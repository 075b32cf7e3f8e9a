//! Prospect command line: search companies and people, capture contact
//! details in batch, export CSV.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use prospect_api::{
    search_companies, search_people, ApiClient, CompanyFilters, PeopleFilters, Person,
};
use prospect_batch::{BatchOrchestrator, BatchProgress};
use prospect_core::{ApiKey, AppConfig};
use prospect_export as export;
use prospect_resolver::ContactResolver;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prospect", version, about = "Lead generation toolkit")]
struct Cli {
    /// API key override (otherwise config file or PROSPECT_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search companies and print them (or write a CSV)
    SearchCompanies(CompanyArgs),
    /// Search people and print them (or write a CSV)
    SearchPeople(PeopleArgs),
    /// Resolve contact details for a list of people, writing a CSV
    Capture(CaptureArgs),
    /// Search companies and write the semicolon-delimited company CSV
    ExportCompanies(CompanyArgs),
    /// Store the API key in the config file
    SetKey {
        /// The key to store
        key: String,
    },
}

#[derive(Args)]
struct CompanyArgs {
    /// Company name query
    #[arg(long)]
    name: Option<String>,
    /// Location query
    #[arg(long)]
    location: Option<String>,
    /// Business area keyword
    #[arg(long)]
    business_area: Option<String>,
    /// Employee range as "min,max"
    #[arg(long)]
    employees: Option<String>,
    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Results per page
    #[arg(long, default_value_t = 25)]
    per_page: u32,
    /// Write results to this CSV file instead of printing JSON
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct PeopleArgs {
    /// Restrict to one organization id
    #[arg(long)]
    organization_id: Option<String>,
    /// Job title filter (repeatable)
    #[arg(long = "title")]
    titles: Vec<String>,
    /// Seniority filter (repeatable)
    #[arg(long = "seniority")]
    seniorities: Vec<String>,
    /// Location filter (repeatable)
    #[arg(long = "location")]
    locations: Vec<String>,
    /// Free-text keywords
    #[arg(long)]
    keywords: Option<String>,
    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Results per page
    #[arg(long, default_value_t = 100)]
    per_page: u32,
    /// Write results to this CSV file instead of printing JSON
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct CaptureArgs {
    /// JSON file holding an array of person records to capture
    #[arg(long)]
    input: PathBuf,
    /// Output CSV path (defaults to a dated filename)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_with_env().context("failed to load configuration")?;

    match cli.command {
        Command::SearchCompanies(args) => {
            let client = build_client(&config, cli.api_key.as_deref())?;
            let response = search_companies(&client, &company_filters(&args)).await?;
            tracing::info!(
                found = response.items.len(),
                total = response.pagination.total_entries,
                "company search finished"
            );
            if let Some(path) = args.csv {
                export::write_csv_file(&path, &export::companies_csv(&response.items))?;
                println!("Wrote {} companies to {}", response.items.len(), path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&response.items)?);
            }
        }
        Command::SearchPeople(args) => {
            let client = build_client(&config, cli.api_key.as_deref())?;
            let response = search_people(&client, &people_filters(&args)).await?;
            tracing::info!(
                found = response.items.len(),
                total = response.pagination.total_entries,
                "people search finished"
            );
            if let Some(path) = args.csv {
                export::write_csv_file(&path, &export::people_csv(&response.items))?;
                println!("Wrote {} people to {}", response.items.len(), path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&response.items)?);
            }
        }
        Command::Capture(args) => {
            let client = build_client(&config, cli.api_key.as_deref())?;
            run_capture(client, &config, &args).await?;
        }
        Command::ExportCompanies(args) => {
            let client = build_client(&config, cli.api_key.as_deref())?;
            let response = search_companies(&client, &company_filters(&args)).await?;
            let path = args
                .csv
                .unwrap_or_else(|| PathBuf::from(export::dated_filename("companies", "csv")));
            export::write_csv_file(&path, &export::companies_csv(&response.items))?;
            println!("Wrote {} companies to {}", response.items.len(), path.display());
        }
        Command::SetKey { key } => {
            let validated = ApiKey::new(&key).context("invalid API key")?;
            let mut config = AppConfig::load().context("failed to load configuration")?;
            config.api.api_key = Some(validated.as_str().to_string());
            config.save().context("failed to save configuration")?;
            println!("API key saved to {}", AppConfig::config_path()?.display());
        }
    }

    Ok(())
}

fn build_client(config: &AppConfig, override_key: Option<&str>) -> Result<ApiClient> {
    let key = override_key
        .map(ToString::to_string)
        .or_else(|| config.api.api_key.clone())
        .context("no API key configured; run `prospect set-key` or set PROSPECT_API_KEY")?;
    let api_key = ApiKey::new(&key).context("invalid API key")?;
    let client = ApiClient::with_options(
        &config.api.base_url,
        api_key,
        Duration::from_secs(config.api.timeout_secs),
        &config.api.user_agent,
    )?;
    Ok(client)
}

fn company_filters(args: &CompanyArgs) -> CompanyFilters {
    CompanyFilters {
        company_name: args.name.clone(),
        location: args.location.clone(),
        business_area: args.business_area.clone(),
        employee_range: args.employees.clone(),
        page: args.page,
        per_page: args.per_page,
    }
}

fn people_filters(args: &PeopleArgs) -> PeopleFilters {
    PeopleFilters {
        organization_id: args.organization_id.clone(),
        person_titles: args.titles.clone(),
        person_seniorities: args.seniorities.clone(),
        person_locations: args.locations.clone(),
        keywords: args.keywords.clone(),
        page: args.page,
        per_page: args.per_page,
    }
}

async fn run_capture(client: ApiClient, config: &AppConfig, args: &CaptureArgs) -> Result<()> {
    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let people: Vec<Person> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of people", args.input.display()))?;
    if people.is_empty() {
        bail!("{} contains no people", args.input.display());
    }

    let resolver = ContactResolver::new(client)
        .with_strategy_timeout(Duration::from_secs(config.batch.strategy_timeout_secs));
    let orchestrator = BatchOrchestrator::from_config(resolver, &config.batch);

    let outcomes = orchestrator
        .run(&people, |progress: BatchProgress| {
            let mark = if progress.result.success { "ok" } else { "failed" };
            println!(
                "[{}/{}] {} - {} ({})",
                progress.current, progress.total, progress.person_name, mark,
                progress.result.message
            );
        })
        .await;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export::dated_filename("capture_results", "csv")));
    export::write_csv_file(&path, &export::capture_results_csv(&outcomes))?;

    let found = outcomes.iter().filter(|o| o.result.success).count();
    println!(
        "Captured {found} of {} contacts; results written to {}",
        outcomes.len(),
        path.display()
    );
    Ok(())
}
