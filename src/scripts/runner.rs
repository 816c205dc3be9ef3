/// Running named functions inside lifecycle scripts
use std::path::Path;
use tracing::info;

use crate::utils::command::{execute, ExecutionError};

/// Runs one named step (shell function) defined inside a script
#[allow(async_fn_in_trait)]
pub trait ScriptRunner {
    /// Source `script` and call `step` in that context
    async fn run_named_step(&self, script: &Path, step: &str) -> Result<(), ExecutionError>;
}

/// `ScriptRunner` that shells out to an interpreter with `-c`
pub struct ShellScriptRunner {
    interpreter: String,
}

impl ShellScriptRunner {
    /// Create a runner for the given interpreter (e.g. "bash")
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl ScriptRunner for ShellScriptRunner {
    async fn run_named_step(&self, script: &Path, step: &str) -> Result<(), ExecutionError> {
        info!("Running {} from {}", step, script.display());
        execute(&self.interpreter, ["-c".to_string(), source_command(script, step)]).await
    }
}

/// Shell command that sources `script` and then calls `step`
///
/// A bare file name is anchored to the working directory: `source` would
/// otherwise search PATH before the file that was checked for existence.
pub fn source_command(script: &Path, step: &str) -> String {
    let anchored = if script.is_relative() && script.components().count() == 1 {
        Path::new(".").join(script)
    } else {
        script.to_path_buf()
    };

    format!(
        "source {} && {}",
        shell_quote(&anchored.to_string_lossy()),
        step
    )
}

/// Single-quote `value` unless it only contains shell-safe characters
fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | '@' | '%' | ',')
        });

    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
