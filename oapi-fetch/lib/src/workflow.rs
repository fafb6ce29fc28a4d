//! The download-and-generate workflow.
//!
//! Stages run strictly in order, each gating the next:
//!
//! 1. Prompt for the spec URL and output directory
//! 2. Check the generator (offering an install) and the Java runtime
//! 3. Download the spec and validate it as JSON
//! 4. Run the generator
//! 5. Remove generator scratch files
//!
//! The first failing stage ends the run. Nothing is retried.
//!
//! ## Examples
//!
//! ```no_run
//! use oapi_fetch_lib::{InquirePrompter, SystemRunner, Workflow, WorkflowConfig};
//!
//! # async fn example() -> oapi_fetch_lib::Result<()> {
//! let workflow = Workflow::new(InquirePrompter, SystemRunner, WorkflowConfig::from_env());
//! let report = workflow.run().await?;
//! println!("client written to {}", report.answers.output_dir.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use reqwest::Client;
use tracing::{info, instrument};

use crate::cleanup::{self, CleanupReport};
use crate::config::WorkflowConfig;
use crate::environment::{self, EnvironmentReport};
use crate::error::Result;
use crate::fetch;
use crate::generate;
use crate::process::{CommandRunner, ProcessOutcome};
use crate::prompt::{self, PresetAnswers, Prompter, SessionAnswers};

/// Class users start from in a `typescript-fetch` client.
const ENTRY_POINT_HINT: &str = "DefaultApi";

/// Everything a successful run produced.
#[derive(Debug)]
pub struct WorkflowReport {
    pub answers: SessionAnswers,
    pub environment: EnvironmentReport,
    /// Path of the downloaded, validated spec.
    pub spec_file: PathBuf,
    /// Generator output; stdout usually holds its log.
    pub generation: ProcessOutcome,
    pub cleanup: CleanupReport,
}

/// One run of the workflow.
///
/// The workflow owns the interactive channel. [`run`](Workflow::run)
/// consumes it, so the prompter is released exactly once whichever way the
/// run ends.
pub struct Workflow<P, R> {
    prompter: P,
    runner: R,
    client: Client,
    config: WorkflowConfig,
}

impl<P: Prompter, R: CommandRunner> Workflow<P, R> {
    pub fn new(prompter: P, runner: R, config: WorkflowConfig) -> Self {
        Self {
            prompter,
            runner,
            client: Client::new(),
            config,
        }
    }

    /// Replaces the HTTP client used for the download.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Runs every stage in order.
    ///
    /// ## Errors
    ///
    /// Returns the first stage failure; see [`WorkflowError`](crate::WorkflowError).
    #[instrument(skip_all)]
    pub async fn run(mut self) -> Result<WorkflowReport> {
        let preset = PresetAnswers {
            spec_url: self.config.spec_url.clone(),
            output_dir: self.config.output_dir.clone(),
        };
        let answers = prompt::collect_answers(&mut self.prompter, &preset)?;

        let environment =
            environment::check_environment(&mut self.prompter, &self.runner, &self.config).await?;

        self.prompter.notify("\n--- downloading spec ---")?;
        let spec_file =
            fetch::download_spec(&self.client, &answers.spec_url, &answers.output_dir).await?;
        self.prompter
            .notify(&format!("downloaded: {}", spec_file.display()))?;

        self.prompter.notify("\n--- generating client ---")?;
        let generation = generate::generate_client(
            &self.runner,
            &self.config,
            &spec_file,
            &answers.output_dir,
        )
        .await?;
        let generator_log = generation.combined_output();
        if !generator_log.is_empty() {
            self.prompter.notify(&generator_log)?;
        }

        let working_dir = self.config.resolved_working_dir();
        let cleanup = cleanup::remove_artifacts(&answers.output_dir, &working_dir);

        self.prompter.notify(&format!(
            "generated client in {}\n\nStart by instantiating the '{}' class.",
            answers.output_dir.display(),
            ENTRY_POINT_HINT
        ))?;
        info!(
            output_dir = %answers.output_dir.display(),
            removed = cleanup.removed.len(),
            failed = cleanup.failed.len(),
            "Workflow finished"
        );

        Ok(WorkflowReport {
            answers,
            environment,
            spec_file,
            generation,
            cleanup,
        })
    }
}
