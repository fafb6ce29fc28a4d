//! oapi-fetch: download an OpenAPI spec and generate a TypeScript client.
//!
//! Thin front end over `oapi_fetch_lib`. The interactive prompts run through
//! `inquire` on a terminal and fall back to plain line input when stdin is
//! piped, so the tool can be scripted.

use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oapi_fetch_lib::{
    InquirePrompter, LinePrompter, Prompter, SystemRunner, Workflow, WorkflowConfig,
    WorkflowError,
};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oapi-fetch")]
#[command(version, about = "Generate a typed API client from an OpenAPI spec URL", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a spec and generate a typescript-fetch client from it
    Download {
        /// Spec URL; skips the URL prompt
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Output directory; skips the directory prompt
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Install the generator without asking when it is missing
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            // -v: stage progress
            1 => "warn,oapi_fetch_lib=info".to_string(),
            2 => "info,oapi_fetch_lib=debug".to_string(),
            _ => "debug,oapi_fetch_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

async fn run_with<P: Prompter>(prompter: P, config: WorkflowConfig) -> oapi_fetch_lib::Result<()> {
    Workflow::new(prompter, SystemRunner, config).run().await?;
    Ok(())
}

fn report_failure(err: &WorkflowError) {
    eprintln!("Error: {err}");
    if let WorkflowError::GenerationFailed { outcome, .. } = err {
        for stream in [&outcome.stdout, &outcome.stderr] {
            let text = stream.trim();
            if !text.is_empty() {
                eprintln!("{text}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    match cli.command {
        Commands::Download { url, output, yes } => {
            let mut config = WorkflowConfig::from_env().auto_install(yes);
            if let Some(url) = url {
                config = config.spec_url(url);
            }
            if let Some(output) = output {
                config = config.output_dir(output);
            }
            tracing::debug!(?config, "Starting download workflow");

            let result = if io::stdin().is_terminal() {
                run_with(InquirePrompter, config).await
            } else {
                run_with(LinePrompter::new(BufReader::new(io::stdin()), io::stdout()), config)
                    .await
            };

            match result {
                Ok(()) => {}
                Err(err) if err.is_declined() => {
                    println!("{err}. Nothing was generated.");
                }
                Err(err) => {
                    report_failure(&err);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
