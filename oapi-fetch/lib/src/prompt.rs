//! Interactive questions and their defaults.
//!
//! The workflow asks exactly two questions, in order: the URL of the
//! OpenAPI spec and the directory the client is generated into. An empty
//! answer falls back to the question's default. Nothing is validated here;
//! a malformed URL or path surfaces in the stage that uses it.
//!
//! Two [`Prompter`] implementations are provided:
//!
//! - [`InquirePrompter`] for an interactive terminal
//! - [`LinePrompter`] for any line-oriented reader/writer pair (piped stdin,
//!   tests)
//!
//! ## Examples
//!
//! ```
//! use std::io::Cursor;
//! use oapi_fetch_lib::prompt::{collect_answers, LinePrompter, PresetAnswers, DEFAULT_SPEC_URL};
//!
//! let mut prompter = LinePrompter::new(Cursor::new("\n./out\n"), Vec::new());
//! let answers = collect_answers(&mut prompter, &PresetAnswers::default()).unwrap();
//! assert_eq!(answers.spec_url, DEFAULT_SPEC_URL);
//! assert_eq!(answers.output_dir.to_str(), Some("./out"));
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Default spec URL offered when the user enters nothing.
pub const DEFAULT_SPEC_URL: &str = "http://localhost:8000/openapi.json";

/// Default output directory offered when the user enters nothing.
pub const DEFAULT_OUTPUT_DIR: &str = "./src/lib/fetch-client";

/// A question with the answer substituted for empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub default: &'static str,
}

/// First question: where to download the spec from.
pub const SPEC_URL_QUESTION: Question = Question {
    text: "URL of the OpenAPI spec to download (e.g. http://localhost:8000/openapi.json):",
    default: DEFAULT_SPEC_URL,
};

/// Second question: where the generated client goes.
pub const OUTPUT_DIR_QUESTION: Question = Question {
    text: "Directory to write the generated client to (e.g. ./src/lib/fetch-client):",
    default: DEFAULT_OUTPUT_DIR,
};

/// Errors raised by the interactive channel.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Reading or writing the channel failed.
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The terminal prompt failed or was cancelled.
    #[error("prompt failed: {0}")]
    Inquire(#[from] inquire::InquireError),
}

/// The interactive channel used by the workflow.
///
/// A prompter owns its input and output for the whole run. It is dropped
/// exactly once, when the workflow that owns it finishes.
pub trait Prompter {
    /// Asks `question` and returns the raw answer (possibly empty).
    fn ask(&mut self, question: &Question) -> Result<String, PromptError>;

    /// Asks a yes/no question. Anything other than an explicit yes is `false`.
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;

    /// Writes an informational line to the user.
    fn notify(&mut self, message: &str) -> Result<(), PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
        (**self).ask(question)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        (**self).confirm(message)
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        (**self).notify(message)
    }
}

/// Answers collected from the user, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswers {
    pub spec_url: String,
    pub output_dir: PathBuf,
}

/// Answers supplied up front (e.g. from command-line flags).
///
/// A preset answer skips its question entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetAnswers {
    pub spec_url: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Substitutes `default` for an empty or whitespace-only answer.
///
/// Non-empty answers are returned unchanged.
pub fn answer_or_default(raw: &str, default: &str) -> String {
    if raw.trim().is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}

/// Asks both questions in order and applies defaults.
///
/// ## Errors
///
/// Returns an error if the prompter cannot read an answer.
pub fn collect_answers<P: Prompter + ?Sized>(
    prompter: &mut P,
    preset: &PresetAnswers,
) -> Result<SessionAnswers, PromptError> {
    let spec_url = match &preset.spec_url {
        Some(url) => answer_or_default(url, SPEC_URL_QUESTION.default),
        None => {
            let raw = prompter.ask(&SPEC_URL_QUESTION)?;
            answer_or_default(&raw, SPEC_URL_QUESTION.default)
        }
    };

    let output_dir = match &preset.output_dir {
        Some(dir) if dir.to_string_lossy().trim().is_empty() => {
            PathBuf::from(OUTPUT_DIR_QUESTION.default)
        }
        Some(dir) => dir.clone(),
        None => {
            let raw = prompter.ask(&OUTPUT_DIR_QUESTION)?;
            PathBuf::from(answer_or_default(&raw, OUTPUT_DIR_QUESTION.default))
        }
    };

    debug!(spec_url, output_dir = %output_dir.display(), "Collected answers");
    Ok(SessionAnswers {
        spec_url,
        output_dir,
    })
}

/// Line-oriented prompter over any reader/writer pair.
///
/// Each question is written to `output` followed by a space, and one line is
/// read from `input`. End of input is treated as an empty answer.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompter and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
        self.read_answer(question.text)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        let answer = self.read_answer(&format!("{message} (y/n)"))?;
        Ok(is_yes(&answer))
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Terminal prompter built on `inquire`.
///
/// Defaults are shown as placeholders so an empty answer visibly maps to
/// them; confirmations default to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
        let answer = inquire::Text::new(question.text)
            .with_placeholder(question.default)
            .prompt()?;
        Ok(answer)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        let answer = inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?;
        Ok(answer)
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        println!("{message}");
        Ok(())
    }
}
