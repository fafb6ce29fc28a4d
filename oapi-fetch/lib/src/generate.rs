//! Runs the generator to produce the client.

use std::path::Path;

use tracing::{info, instrument};

use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::process::{CommandRunner, ProcessOutcome, command_line};

/// Builds `generate -i <spec> -g <kind> -o <output_dir>`.
pub fn generate_args(spec_file: &Path, generator_kind: &str, output_dir: &Path) -> Vec<String> {
    vec![
        "generate".to_string(),
        "-i".to_string(),
        spec_file.display().to_string(),
        "-g".to_string(),
        generator_kind.to_string(),
        "-o".to_string(),
        output_dir.display().to_string(),
    ]
}

/// Generates the client from `spec_file` into `output_dir`.
///
/// Returns the generator's outcome; its stdout usually carries the
/// generator's log even on success.
///
/// ## Errors
///
/// - [`WorkflowError::Spawn`] when the generator cannot be started
/// - [`WorkflowError::GenerationFailed`] when it exits non-zero; the outcome
///   carries both streams
#[instrument(skip_all, fields(spec = %spec_file.display(), output_dir = %output_dir.display()))]
pub async fn generate_client<R: CommandRunner>(
    runner: &R,
    config: &WorkflowConfig,
    spec_file: &Path,
    output_dir: &Path,
) -> Result<ProcessOutcome> {
    let args = generate_args(spec_file, &config.generator_kind, output_dir);
    let command = command_line(&config.generator_binary, &args);
    info!(command = %command, "Generating client");

    let outcome = runner
        .run(&config.generator_binary, &args)
        .await
        .map_err(|source| WorkflowError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !outcome.success() {
        return Err(WorkflowError::GenerationFailed { command, outcome });
    }

    info!("Client generated");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_generate_args_match_generator_cli() {
        let args = generate_args(
            &PathBuf::from("./out/openapi.json"),
            "typescript-fetch",
            &PathBuf::from("./out"),
        );
        assert_eq!(
            args,
            vec!["generate", "-i", "./out/openapi.json", "-g", "typescript-fetch", "-o", "./out"]
        );
    }

    #[test]
    fn test_generate_args_keep_joined_paths() {
        let out = PathBuf::from("./out");
        let spec = out.join("openapi.json");
        let args = generate_args(&spec, "typescript-fetch", &out);
        assert_eq!(args[2], "./out/openapi.json");
        assert_eq!(args[6], "./out");
    }
}
