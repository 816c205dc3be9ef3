/// Configuration management for iac-tool
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "iac-tool.yaml";

/// Name of the built-in SSH verification step
pub const SSH_VERIFY_STEP: &str = "ssh-verify";

/// Environment variable overriding the configured interpreter
pub const INTERPRETER_ENV: &str = "IAC_TOOL_INTERPRETER";

/// Main tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Interpreter used to source the scripts (can also be set via IAC_TOOL_INTERPRETER)
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Lifecycle steps, keyed by name
    #[serde(default)]
    pub steps: BTreeMap<String, StepConfig>,
}

/// A lifecycle step: a shell function defined in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Script to source, relative to the working directory
    pub script: PathBuf,

    /// Function to call once the script is sourced
    pub function: String,

    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_interpreter() -> String {
    "bash".to_string()
}

impl StepConfig {
    /// Step that runs SSH access verification against all VM nodes
    pub fn ssh_verify() -> Self {
        Self {
            script: PathBuf::from("./scripts/utils_ssh.sh"),
            function: "prompt_verify_ssh".to_string(),
            description: Some("Verify SSH connectivity to all VM nodes".to_string()),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            steps: BTreeMap::new(),
        }
        .with_builtin_steps()
    }
}

impl ToolConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ToolConfig = serde_yaml::from_str(&content)?;
        let config = config.with_builtin_steps();
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for this run
    ///
    /// An explicit path must exist. Without one, `iac-tool.yaml` is read if
    /// present and the built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Add the built-in steps the file does not override
    fn with_builtin_steps(mut self) -> Self {
        self.steps
            .entry(SSH_VERIFY_STEP.to_string())
            .or_insert_with(StepConfig::ssh_verify);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interpreter.trim().is_empty() {
            anyhow::bail!("interpreter cannot be empty");
        }

        for (name, step) in &self.steps {
            if name.trim().is_empty() {
                anyhow::bail!("step names cannot be empty");
            }

            if step.script.as_os_str().is_empty() {
                anyhow::bail!("step '{}' has an empty script path", name);
            }

            // The path is written into the shell command as text
            if step.script.to_str().is_none() {
                anyhow::bail!(
                    "step '{}' has a non UTF-8 script path: {}",
                    name,
                    step.script.display()
                );
            }

            self.validate_function_name(name, &step.function)?;
        }

        Ok(())
    }

    /// The function name is spliced into a shell command, so only plain identifiers pass
    fn validate_function_name(&self, step: &str, function: &str) -> anyhow::Result<()> {
        let mut chars = function.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };

        if !valid {
            anyhow::bail!(
                "step '{}' has an invalid function name: '{}'",
                step,
                function
            );
        }
        Ok(())
    }

    /// Look up a step by name
    pub fn step(&self, name: &str) -> anyhow::Result<&StepConfig> {
        self.steps.get(name).ok_or_else(|| {
            let available: Vec<&str> = self.steps.keys().map(String::as_str).collect();
            anyhow::anyhow!(
                "Unknown step '{}'. Available steps: {}",
                name,
                available.join(", ")
            )
        })
    }

    /// Get the interpreter from the environment or config
    pub fn get_interpreter(&self) -> String {
        std::env::var(INTERPRETER_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.interpreter.clone())
    }

    /// Generate an example configuration file
    pub fn example() -> Self {
        let mut steps = BTreeMap::new();
        steps.insert(SSH_VERIFY_STEP.to_string(), StepConfig::ssh_verify());

        Self {
            interpreter: default_interpreter(),
            steps,
        }
    }
}
