//! Download an OpenAPI spec and generate a typed client from it.
//!
//! The library drives `openapi-generator-cli` as an external process; it
//! does not generate code itself. See [`workflow`] for the stage order and
//! [`WorkflowError`] for how each stage fails.

pub mod cleanup;
pub mod config;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod java_version;
pub mod process;
pub mod prompt;
pub mod workflow;

pub use cleanup::CleanupReport;
pub use config::WorkflowConfig;
pub use environment::{EnvironmentReport, JavaCheck};
pub use error::{Result, WorkflowError};
pub use process::{CommandRunner, ProcessOutcome, SystemRunner};
pub use prompt::{InquirePrompter, LinePrompter, Prompter, SessionAnswers};
pub use workflow::{Workflow, WorkflowReport};
