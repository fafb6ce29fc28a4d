//! Run configuration: which external programs to call and preset answers.

use std::path::PathBuf;

/// Generator binary installed by the npm package.
pub const DEFAULT_GENERATOR_BINARY: &str = "openapi-generator-cli";

/// npm package that provides [`DEFAULT_GENERATOR_BINARY`].
pub const DEFAULT_GENERATOR_PACKAGE: &str = "@openapitools/openapi-generator-cli";

/// Package manager used for the global install.
pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

/// Java launcher probed for the runtime check.
pub const DEFAULT_JAVA_BINARY: &str = "java";

/// Client flavour passed to the generator's `-g` flag.
pub const GENERATOR_KIND: &str = "typescript-fetch";

/// Environment variable overriding the generator binary.
pub const ENV_GENERATOR: &str = "OAPI_FETCH_GENERATOR";

/// Environment variable overriding the Java binary.
pub const ENV_JAVA: &str = "OAPI_FETCH_JAVA";

/// Environment variable overriding the package manager.
pub const ENV_NPM: &str = "OAPI_FETCH_NPM";

/// Configuration for a workflow run.
///
/// Use the builder methods to customize it.
///
/// ## Examples
///
/// ```
/// use oapi_fetch_lib::WorkflowConfig;
/// use std::path::PathBuf;
///
/// let config = WorkflowConfig::new()
///     .spec_url("http://localhost:8000/openapi.json")
///     .working_dir(PathBuf::from("/tmp/project"))
///     .auto_install(true);
/// assert_eq!(config.generator_binary, "openapi-generator-cli");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Generator executable name or path.
    pub generator_binary: String,
    /// npm package installed when the generator is missing.
    pub generator_package: String,
    /// Package manager executable used for the install.
    pub package_manager: String,
    /// Java executable name or path.
    pub java_binary: String,
    /// Value for the generator's `-g` flag.
    pub generator_kind: String,
    /// Directory the generator runs in; `openapitools.json` is removed from
    /// here. Defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
    /// Install a missing generator without asking.
    pub auto_install: bool,
    /// Answer for the spec URL question, skipping the prompt.
    pub spec_url: Option<String>,
    /// Answer for the output directory question, skipping the prompt.
    pub output_dir: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator_binary: DEFAULT_GENERATOR_BINARY.to_string(),
            generator_package: DEFAULT_GENERATOR_PACKAGE.to_string(),
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            java_binary: DEFAULT_JAVA_BINARY.to_string(),
            generator_kind: GENERATOR_KIND.to_string(),
            working_dir: None,
            auto_install: false,
            spec_url: None,
            output_dir: None,
        }
    }
}

impl WorkflowConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with binaries overridden from `OAPI_FETCH_GENERATOR`,
    /// `OAPI_FETCH_JAVA` and `OAPI_FETCH_NPM` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(generator) = non_empty(ENV_GENERATOR) {
            config.generator_binary = generator;
        }
        if let Some(java) = non_empty(ENV_JAVA) {
            config.java_binary = java;
        }
        if let Some(npm) = non_empty(ENV_NPM) {
            config.package_manager = npm;
        }
        config
    }

    /// Set the generator executable.
    pub fn generator_binary(mut self, binary: impl Into<String>) -> Self {
        self.generator_binary = binary.into();
        self
    }

    /// Set the Java executable.
    pub fn java_binary(mut self, binary: impl Into<String>) -> Self {
        self.java_binary = binary.into();
        self
    }

    /// Set the package manager executable.
    pub fn package_manager(mut self, binary: impl Into<String>) -> Self {
        self.package_manager = binary.into();
        self
    }

    /// Set the directory cleanup treats as the invocation root.
    pub fn working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Install a missing generator without asking.
    pub fn auto_install(mut self, enable: bool) -> Self {
        self.auto_install = enable;
        self
    }

    /// Pre-answer the spec URL question.
    pub fn spec_url(mut self, url: impl Into<String>) -> Self {
        self.spec_url = Some(url.into());
        self
    }

    /// Pre-answer the output directory question.
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Working directory, falling back to the process's current directory.
    pub fn resolved_working_dir(&self) -> PathBuf {
        self.working_dir.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.generator_binary, "openapi-generator-cli");
        assert_eq!(config.generator_package, "@openapitools/openapi-generator-cli");
        assert_eq!(config.package_manager, "npm");
        assert_eq!(config.java_binary, "java");
        assert_eq!(config.generator_kind, "typescript-fetch");
        assert!(!config.auto_install);
        assert!(config.spec_url.is_none());
    }

    #[test]
    fn test_from_lookup_overrides_binaries() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_GENERATOR, "/opt/gen/bin/openapi-generator-cli"),
            (ENV_JAVA, "/usr/lib/jvm/java-17/bin/java"),
        ]);
        let config = WorkflowConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.generator_binary, "/opt/gen/bin/openapi-generator-cli");
        assert_eq!(config.java_binary, "/usr/lib/jvm/java-17/bin/java");
        assert_eq!(config.package_manager, DEFAULT_PACKAGE_MANAGER);
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config = WorkflowConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, WorkflowConfig::default());
    }

    #[test]
    fn test_builder_sets_presets() {
        let config = WorkflowConfig::new()
            .spec_url("http://host/spec.json")
            .output_dir(PathBuf::from("./out"))
            .working_dir(PathBuf::from("/work"))
            .auto_install(true);
        assert_eq!(config.spec_url.as_deref(), Some("http://host/spec.json"));
        assert_eq!(config.output_dir, Some(PathBuf::from("./out")));
        assert_eq!(config.resolved_working_dir(), PathBuf::from("/work"));
        assert!(config.auto_install);
    }
}
