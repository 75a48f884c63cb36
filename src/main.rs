use exhibit_enrich::commands::{self, EnrichOptions};
use exhibit_enrich::config::LlmOverrides;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exhibit-enrich")]
#[command(about = "Convert exhibit CSV exports to JSON and add LLM-written descriptions")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file (first row = header) into a JSON array of records
    Convert {
        /// CSV file to read
        #[arg(short, long, default_value = "exhibits.csv")]
        input: PathBuf,

        /// JSON file to write
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,
    },
    /// Generate a description for every record that has name, era and theme
    Enrich {
        /// JSON array of records to read
        #[arg(short, long, default_value = "data.json")]
        input: PathBuf,

        /// JSON file to write (must differ from the input)
        #[arg(short, long, default_value = "data_updated.json")]
        output: PathBuf,

        /// Built-in prompt profile: concise or curator
        #[arg(short, long, default_value = "concise")]
        profile: String,

        /// Custom prompt template with {name}, {era} and {theme} slots
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Override the profile's sampling temperature (0.0 - 2.0)
        #[arg(long)]
        temperature: Option<f32>,

        /// Chat model (or set OPENAI_MODEL env var)
        #[arg(long)]
        model: Option<String>,

        /// OpenAI API key (or set OPENAI_API_KEY env var)
        #[arg(long)]
        api_key: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Convert { input, output } => {
            let summary = commands::convert(&input, &output)?;
            info!(
                "Converted '{}' to '{}' ({} records, columns: {})",
                input.display(),
                output.display(),
                summary.records,
                summary.columns.join(", ")
            );
        }
        Commands::Enrich {
            input,
            output,
            profile,
            template,
            temperature,
            model,
            api_key,
            timeout_secs,
        } => {
            let options = EnrichOptions {
                input,
                output: output.clone(),
                profile,
                template,
                temperature,
                llm: LlmOverrides {
                    api_key,
                    model,
                    timeout_secs,
                },
            };
            let summary = commands::enrich(options).await?;
            info!(
                "Done: {} updated, {} skipped, {} failed of {} records",
                summary.updated, summary.skipped, summary.failed, summary.total
            );
            info!("Updated file: {}", output.display());
        }
    }
    Ok(())
}
