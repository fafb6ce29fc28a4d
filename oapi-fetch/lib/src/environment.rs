//! Checks that the external toolchain is usable before any work starts.
//!
//! Two independent checks gate the workflow:
//!
//! - **Generator presence**: `openapi-generator-cli version` must exit zero
//!   and print something. When it does not, the user may install the npm
//!   package globally.
//! - **Java runtime**: `java -version` must report a major version of at
//!   least [`MIN_JAVA_MAJOR`]. The generator is a Java program and fails in
//!   confusing ways on older runtimes.
//!
//! Both checks run through a [`CommandRunner`], so tests can script the
//! responses without touching the real system.

use tracing::{debug, info, instrument, warn};

use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::java_version;
use crate::process::{CommandRunner, ProcessOutcome, Stream, command_line};
use crate::prompt::Prompter;

/// Oldest Java major version the generator supports.
pub const MIN_JAVA_MAJOR: u32 = 11;

/// Argument that makes the generator print its version.
const GENERATOR_VERSION_ARG: &str = "version";

/// Argument that makes Java print its version (to stderr).
const JAVA_VERSION_ARG: &str = "-version";

/// Result of probing the Java runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaCheck {
    /// `java` could be started.
    pub found: bool,
    /// The reported major version is at least [`MIN_JAVA_MAJOR`].
    pub compatible: bool,
    /// Version as printed, when it could be parsed.
    pub version: Option<String>,
    /// Parsed major version.
    pub major: Option<u32>,
    /// Why the check failed, if it did.
    pub problem: Option<String>,
}

impl JavaCheck {
    fn missing(problem: String) -> Self {
        Self {
            problem: Some(problem),
            ..Default::default()
        }
    }
}

/// Outcome of the full environment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    /// Generator version line, e.g. `7.10.0`.
    pub generator_version: String,
    /// Whether the generator was installed during this run.
    pub generator_installed: bool,
    pub java: JavaCheck,
}

/// Runs `<generator> version` and returns its first output line when the
/// generator is present.
#[instrument(skip(runner))]
pub async fn probe_generator<R: CommandRunner>(runner: &R, binary: &str) -> Option<String> {
    let args = vec![GENERATOR_VERSION_ARG.to_string()];
    match runner.run(binary, &args).await {
        Ok(outcome) if outcome.success() => {
            let version = outcome.first_line(Stream::Stdout).map(str::to_string);
            if version.is_none() {
                debug!("Generator exited zero without printing a version");
            }
            version
        }
        Ok(outcome) => {
            debug!(exit_code = ?outcome.exit_code, "Generator version probe failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "Generator could not be started");
            None
        }
    }
}

/// Installs the generator package globally with the configured package manager.
///
/// ## Errors
///
/// Returns [`WorkflowError::GeneratorInstallFailed`] when the package manager
/// cannot be started or exits non-zero.
#[instrument(skip(runner, config), fields(package = %config.generator_package))]
pub async fn install_generator<R: CommandRunner>(
    runner: &R,
    config: &WorkflowConfig,
) -> Result<ProcessOutcome> {
    let args = install_args(&config.generator_package);
    let command = command_line(&config.package_manager, &args);
    info!(command = %command, "Installing generator");

    let outcome = runner
        .run(&config.package_manager, &args)
        .await
        .map_err(|e| WorkflowError::GeneratorInstallFailed {
            package: config.generator_package.clone(),
            command: command.clone(),
            detail: e.to_string(),
        })?;

    if !outcome.success() {
        let output = outcome.combined_output();
        let detail = if output.is_empty() {
            outcome.status_label()
        } else {
            format!("{}\n{}", outcome.status_label(), output)
        };
        return Err(WorkflowError::GeneratorInstallFailed {
            package: config.generator_package.clone(),
            command,
            detail,
        });
    }

    Ok(outcome)
}

/// Arguments for a global npm install of `package`.
pub fn install_args(package: &str) -> Vec<String> {
    vec!["install".to_string(), "-g".to_string(), package.to_string()]
}

/// Makes sure the generator is available, offering to install it.
///
/// ## Errors
///
/// - [`WorkflowError::GeneratorInstallDeclined`] when the user says no
/// - [`WorkflowError::GeneratorInstallFailed`] when installation fails or the
///   generator is still missing afterwards
pub async fn ensure_generator<P, R>(
    prompter: &mut P,
    runner: &R,
    config: &WorkflowConfig,
) -> Result<(String, bool)>
where
    P: Prompter + ?Sized,
    R: CommandRunner,
{
    if let Some(version) = probe_generator(runner, &config.generator_binary).await {
        info!(version, "Generator found");
        return Ok((version, false));
    }

    let question = format!(
        "'{}' was not found. Install {} globally with {}?",
        config.generator_binary, config.generator_package, config.package_manager
    );
    let approved = config.auto_install || prompter.confirm(&question)?;
    if !approved {
        return Err(WorkflowError::GeneratorInstallDeclined {
            binary: config.generator_binary.clone(),
        });
    }

    install_generator(runner, config).await?;

    match probe_generator(runner, &config.generator_binary).await {
        Some(version) => {
            info!(version, "Generator installed");
            Ok((version, true))
        }
        None => Err(WorkflowError::GeneratorInstallFailed {
            package: config.generator_package.clone(),
            command: command_line(
                &config.package_manager,
                &install_args(&config.generator_package),
            ),
            detail: format!(
                "installation finished but '{}' is still not runnable",
                config.generator_binary
            ),
        }),
    }
}

/// Probes the Java runtime.
///
/// Java prints its version to stderr, so stderr is read first and stdout
/// only when stderr is empty.
#[instrument(skip(runner))]
pub async fn check_java<R: CommandRunner>(runner: &R, binary: &str) -> JavaCheck {
    let args = vec![JAVA_VERSION_ARG.to_string()];
    let outcome = match runner.run(binary, &args).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Java could not be started");
            return JavaCheck::missing(format!("'{binary}' could not be run: {e}"));
        }
    };

    let text = if outcome.stderr.trim().is_empty() {
        &outcome.stdout
    } else {
        &outcome.stderr
    };

    match java_version::parse(text) {
        Ok(version) => {
            let compatible = version.major >= MIN_JAVA_MAJOR;
            debug!(version = %version.raw, major = version.major, compatible, "Java detected");
            JavaCheck {
                found: true,
                compatible,
                problem: (!compatible).then(|| format!("found Java {}", version.raw)),
                version: Some(version.raw),
                major: Some(version.major),
            }
        }
        Err(e) => {
            warn!(error = %e, "Could not read Java version");
            JavaCheck {
                found: true,
                problem: Some(format!("could not read the Java version: {e}")),
                ..Default::default()
            }
        }
    }
}

/// Runs both checks in order: generator first, then Java.
///
/// ## Errors
///
/// Fails with the first check that does not pass; see [`ensure_generator`]
/// and [`WorkflowError::JavaMissingOrIncompatible`].
pub async fn check_environment<P, R>(
    prompter: &mut P,
    runner: &R,
    config: &WorkflowConfig,
) -> Result<EnvironmentReport>
where
    P: Prompter + ?Sized,
    R: CommandRunner,
{
    let (generator_version, generator_installed) =
        ensure_generator(prompter, runner, config).await?;

    let java = check_java(runner, &config.java_binary).await;
    if !java.compatible {
        let detail = java
            .problem
            .clone()
            .unwrap_or_else(|| "Java runtime not usable".to_string());
        return Err(WorkflowError::JavaMissingOrIncompatible { detail });
    }

    Ok(EnvironmentReport {
        generator_version,
        generator_installed,
        java,
    })
}
