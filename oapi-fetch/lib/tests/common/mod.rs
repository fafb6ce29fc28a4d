//! Scripted stand-ins for the terminal and the external toolchain.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use oapi_fetch_lib::cleanup::{IGNORE_FILE, SCRATCH_DIR, TOOL_CONFIG_FILE};
use oapi_fetch_lib::process::command_line;
use oapi_fetch_lib::prompt::{PromptError, Question};
use oapi_fetch_lib::{CommandRunner, ProcessOutcome, Prompter};

pub const JAVA_17: &str = "openjdk version \"17.0.2\" 2022-01-18\nOpenJDK Runtime Environment (build 17.0.2+8-86)\n";
pub const JAVA_8: &str = "java version \"1.8.0_301\"\nJava(TM) SE Runtime Environment (build 1.8.0_301-b09)\n";

/// Prompter that replays queued answers and records what was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    pub asked: Vec<String>,
    pub confirm_questions: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    pub fn noticed(&self, needle: &str) -> bool {
        self.notices.iter().any(|n| n.contains(needle))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &Question) -> Result<String, PromptError> {
        self.asked.push(question.text.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        self.confirm_questions.push(message.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }

    fn notify(&mut self, message: &str) -> Result<(), PromptError> {
        self.notices.push(message.to_string());
        Ok(())
    }
}

/// Fake `openapi-generator-cli` / `npm` / `java` trio.
///
/// `generate` writes the same artifacts the real generator does, so cleanup
/// can be observed end to end.
#[derive(Debug)]
pub struct FakeToolchain {
    generator_present: AtomicBool,
    install_exit: i32,
    java_output: Option<String>,
    generate_exit: i32,
    working_dir: PathBuf,
    calls: Mutex<Vec<String>>,
    spec_seen: Mutex<Option<Vec<u8>>>,
}

impl FakeToolchain {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            generator_present: AtomicBool::new(true),
            install_exit: 0,
            java_output: Some(JAVA_17.to_string()),
            generate_exit: 0,
            working_dir: working_dir.to_path_buf(),
            calls: Mutex::new(Vec::new()),
            spec_seen: Mutex::new(None),
        }
    }

    pub fn without_generator(self) -> Self {
        self.generator_present.store(false, Ordering::SeqCst);
        self
    }

    pub fn install_exit(mut self, code: i32) -> Self {
        self.install_exit = code;
        self
    }

    pub fn with_java(mut self, output: Option<&str>) -> Self {
        self.java_output = output.map(str::to_string);
        self
    }

    pub fn generate_exit(mut self, code: i32) -> Self {
        self.generate_exit = code;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    /// Bytes of the spec file as the generator saw them.
    pub fn spec_seen(&self) -> Option<Vec<u8>> {
        self.spec_seen.lock().unwrap().clone()
    }

    fn generator(&self, args: &[String]) -> io::Result<ProcessOutcome> {
        if !self.generator_present.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        }
        match args.first().map(String::as_str) {
            Some("version") => Ok(ProcessOutcome::success_with("7.10.0\n")),
            Some("generate") => self.generate(args),
            _ => Ok(ProcessOutcome::failure_with(1, "unknown command")),
        }
    }

    fn generate(&self, args: &[String]) -> io::Result<ProcessOutcome> {
        let flag = |name: &str| {
            args.iter()
                .position(|a| a == name)
                .and_then(|i| args.get(i + 1))
                .map(PathBuf::from)
                .expect("generate flag present")
        };
        let spec = flag("-i");
        let out = flag("-o");

        *self.spec_seen.lock().unwrap() = Some(std::fs::read(&spec)?);

        std::fs::create_dir_all(out.join(SCRATCH_DIR))?;
        std::fs::write(out.join(SCRATCH_DIR).join("VERSION"), "7.10.0\n")?;
        std::fs::write(out.join(IGNORE_FILE), "# OpenAPI Generator Ignore\n")?;
        std::fs::write(self.working_dir.join(TOOL_CONFIG_FILE), r#"{"spaces":2}"#)?;

        if self.generate_exit != 0 {
            return Ok(ProcessOutcome {
                exit_code: Some(self.generate_exit),
                stdout: "[main] INFO  o.o.codegen.DefaultGenerator - Generating\n".to_string(),
                stderr: "Exception in thread \"main\" java.lang.RuntimeException: bad spec\n"
                    .to_string(),
            });
        }

        std::fs::create_dir_all(out.join("apis"))?;
        std::fs::write(out.join("apis").join("DefaultApi.ts"), "export class DefaultApi {}\n")?;
        std::fs::write(out.join("index.ts"), "export * from './apis/index';\n")?;
        Ok(ProcessOutcome {
            exit_code: Some(0),
            stdout: "[main] INFO  o.o.codegen.TemplateManager - writing file index.ts\n"
                .to_string(),
            stderr: String::new(),
        })
    }

    fn npm(&self) -> io::Result<ProcessOutcome> {
        if self.install_exit == 0 {
            self.generator_present.store(true, Ordering::SeqCst);
            Ok(ProcessOutcome::success_with("added 1 package\n"))
        } else {
            Ok(ProcessOutcome::failure_with(self.install_exit, "npm ERR! code EACCES\n"))
        }
    }

    fn run_java(&self) -> io::Result<ProcessOutcome> {
        match &self.java_output {
            Some(text) => Ok(ProcessOutcome {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: text.clone(),
            }),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
        }
    }
}

impl CommandRunner for FakeToolchain {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutcome> {
        self.calls.lock().unwrap().push(command_line(program, args));
        match program {
            "openapi-generator-cli" => self.generator(args),
            "npm" => self.npm(),
            "java" => self.run_java(),
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
        }
    }
}
